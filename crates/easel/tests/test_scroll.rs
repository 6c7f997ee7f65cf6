//! Integration tests for scroll areas and scroll bars.

#[cfg(test)]
mod tests {
    use easel::{
        NodeId,
        color::Color,
        error::{Error, Result},
        event::mouse::MouseButton,
        geom::{Point, Rect},
        settings::Settings,
        testing::{Harness, widgets::Block},
        widgets::ScrollArea,
    };

    const BLUE: Color = Color::rgb(0, 0, 255);
    const BAR: Color = Color::rgb(64, 64, 64);

    /// A 100x100 screen with a barred scroll area over a 200x400 body.
    fn setup(overrides: Settings) -> Result<(Harness, NodeId, NodeId)> {
        let mut h = Harness::new((100, 100))?;
        let tree = h.tree_mut();
        let body = tree.add(Block::fixed(200, 400).named("body").filled(BLUE))?;
        let area = tree.create(ScrollArea::new().with_bars(), vec![body], &overrides)?;
        h.app.add_window(area)?;
        h.frame()?;
        Ok((h, area, body))
    }

    /// The body's viewport.
    fn viewport(h: &Harness, body: NodeId) -> Result<Rect> {
        h.tree()
            .node(body)?
            .viewport()
            .ok_or_else(|| Error::Internal("no viewport".into()))
    }

    #[test]
    fn layout_with_bars() -> Result<()> {
        let (h, area, body) = setup(Settings::new())?;
        let t = h.tree();
        assert_eq!(t.node(area)?.rect(), Rect::new(0, 0, 100, 100));
        assert_eq!(t.node(body)?.rect(), Rect::new(0, 0, 200, 400));
        assert_eq!(viewport(&h, body)?, Rect::new(0, 0, 80, 80));
        let bars = &t.children(area)?[1..];
        assert_eq!(t.node(bars[0])?.rect(), Rect::new(80, 0, 20, 80));
        assert_eq!(t.node(bars[1])?.rect(), Rect::new(0, 80, 80, 20));
        assert_eq!(t.screen_rect(body), Some(Rect::new(0, 0, 80, 80)));

        assert_eq!(h.pixel((40, 40)), Some(BLUE));
        // Thumb at the top of the right bar, bar background below it.
        assert_eq!(h.pixel((90, 5)), Some(Color::WHITE));
        assert_eq!(h.pixel((90, 70)), Some(BAR));
        Ok(())
    }

    #[test]
    fn scroll_to_moves_viewport() -> Result<()> {
        let (mut h, area, body) = setup(Settings::new())?;
        ScrollArea::scroll_to(h.tree_mut(), area, Rect::new(0, 390, 10, 10))?;
        h.frame()?;
        assert_eq!(viewport(&h, body)?, Rect::new(0, 320, 80, 80));
        // Thumb now at the bottom.
        assert_eq!(h.pixel((90, 70)), Some(Color::WHITE));
        assert_eq!(h.pixel((90, 5)), Some(BAR));
        assert!(ScrollArea::scroll_to(h.tree_mut(), area, Rect::new(0, 395, 10, 10)).is_err());
        Ok(())
    }

    #[test]
    fn bar_jump_and_drag() -> Result<()> {
        let (mut h, _, body) = setup(Settings::new())?;
        assert!(h.press(MouseButton::Left, (90, 40))?);
        assert_eq!(viewport(&h, body)?.tl, Point::new(0, 162));
        h.move_to((90, 79))?;
        assert_eq!(viewport(&h, body)?.tl, Point::new(0, 320));
        h.release(MouseButton::Left, (90, 79))?;
        h.move_to((90, 0))?;
        assert_eq!(viewport(&h, body)?.tl, Point::new(0, 320));
        Ok(())
    }

    #[test]
    fn mouse_wheel() -> Result<()> {
        let (mut h, _, body) = setup(Settings::new())?;
        assert!(h.press(MouseButton::WheelDown, (40, 40))?);
        assert_eq!(viewport(&h, body)?.tl, Point::new(0, 20));
        h.press(MouseButton::WheelUp, (40, 40))?;
        h.press(MouseButton::WheelUp, (40, 40))?;
        assert_eq!(viewport(&h, body)?.tl, Point::new(0, 0));

        let (mut h, _, body) = setup(Settings::new().with("mousewheel_scroll", 7))?;
        h.press(MouseButton::WheelDown, (40, 40))?;
        assert_eq!(viewport(&h, body)?.tl, Point::new(0, 7));
        Ok(())
    }

    #[test]
    fn unbounded_body_is_an_error() -> Result<()> {
        let mut h = Harness::new((100, 100))?;
        let tree = h.tree_mut();
        let body = tree.create(
            Block::new((0, 0), (10, 10)),
            vec![],
            &Settings::new().with("greedy_height", true),
        )?;
        let area = tree.create(ScrollArea::new().vertical(true), vec![body], &Settings::new())?;
        h.app.add_window(area)?;
        assert!(matches!(h.frame(), Err(Error::Invariant(_))));
        Ok(())
    }
}
