//! Integration tests for configuration and the settings cascade.

#[cfg(test)]
mod tests {
    use easel::{
        color::Color,
        error::{Error, Result},
        event::mouse::MouseButton,
        settings::{AppConfig, SettingValue, Settings},
        testing::{Harness, widgets::Block},
        widgets::{Button, Panel, TextArea},
    };

    const CONFIG: &str = r##"{
        "framerate": 60,
        "settings": {
            "margin": 1,
            "button": {"margin": 7, "highlight_color": [0, 255, 0]},
            "text_area": {"border_color": "#102030"}
        }
    }"##;

    #[test]
    fn parse_config() -> Result<()> {
        let config = AppConfig::from_json(CONFIG)?;
        assert_eq!(config.framerate, 60);
        assert_eq!(config.timer_slack_ms, 5);
        let s = &config.settings;
        assert_eq!(s.get("margin"), Some(&SettingValue::Int(1)));
        let resolved = s.resolved_for("button");
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0], ("margin", &SettingValue::Int(1)));
        assert!(resolved.contains(&("margin", &SettingValue::Int(7))));
        Ok(())
    }

    #[test]
    fn invalid_configs() {
        let bad = [
            r#"{"settings": {"Margin": 1}}"#,
            r#"{"settings": {"button": {"Margin": 1}}}"#,
            r#"{"framerate": 0}"#,
            r#"{"framerate": "fast"}"#,
            "not json",
        ];
        for s in bad {
            assert!(
                matches!(AppConfig::from_json(s), Err(Error::Config(_))),
                "accepted {s}"
            );
        }
    }

    #[test]
    fn type_keys_override_generic_keys() -> Result<()> {
        let mut h = Harness::with_config((100, 100), AppConfig::from_json(CONFIG)?)?;
        let tree = h.tree_mut();
        let label = tree.add(Block::fixed(20, 10))?;
        let button = tree.create(Button::new(), vec![label], &Settings::new())?;
        h.app.add_window(button)?;
        h.frame()?;

        let t = h.tree();
        assert_eq!(t.attrs(t.root())?.margin, 1);
        assert_eq!(t.attrs(label)?.margin, 1);
        assert_eq!(t.attrs(button)?.margin, 7);
        // The screen's margin shrinks the centering area by one on each side.
        assert_eq!(t.node(button)?.rect().tl.x, 33);
        assert_eq!(t.node(button)?.size().w, 34);
        assert_eq!(t.node(button)?.size().h, 24);

        h.press(MouseButton::Left, (50, 50))?;
        assert_eq!(h.pixel((33, 38)), Some(Color::rgb(0, 255, 0)));
        Ok(())
    }

    #[test]
    fn cascade_skips_unknown_keys() -> Result<()> {
        let mut h = Harness::new((100, 100))?;
        let tree = h.tree_mut();
        let block = tree.add(Block::new((0, 0), (10, 10)))?;
        let panel = tree.create(Panel::new(), vec![block], &Settings::new())?;
        let settings = Settings::new()
            .with("num_cols", 10)
            .with("spacing", 2)
            .with("panel", Settings::new().with("bgcolor", "red"));
        tree.apply_settings(panel, &settings)?;
        assert_eq!(tree.attrs(panel)?.spacing, 2);
        assert_eq!(tree.attrs(block)?.spacing, 2);
        assert_eq!(tree.attrs(panel)?.bgcolor, Some(Color::rgb(255, 0, 0)));
        assert_eq!(tree.attrs(block)?.bgcolor, None);
        Ok(())
    }

    #[test]
    fn unknown_key_at_create_is_an_error() -> Result<()> {
        let mut h = Harness::new((100, 100))?;
        let tree = h.tree_mut();
        let err = tree.create(Button::new(), vec![], &Settings::new().with("num_cols", 3));
        assert!(matches!(err, Err(Error::Config(_))));
        let err = tree.create(Panel::new(), vec![], &Settings::new().with("margin", -1));
        assert!(matches!(err, Err(Error::Config(_))));
        let ok = tree.create(TextArea::new(""), vec![], &Settings::new().with("num_cols", 3));
        assert!(ok.is_ok());
        Ok(())
    }

    #[test]
    fn mistyped_setting_fails_at_startup() -> Result<()> {
        let config = AppConfig::from_json(r#"{"settings": {"margin": "wide"}}"#)?;
        assert!(matches!(
            Harness::with_config((10, 10), config),
            Err(Error::Config(_))
        ));
        let config = AppConfig::from_json(r#"{"settings": {"color": "mauve-ish"}}"#)?;
        assert!(Harness::with_config((10, 10), config).is_err());
        Ok(())
    }

    #[test]
    fn null_clears_background() -> Result<()> {
        let mut h = Harness::new((10, 10))?;
        let tree = h.tree_mut();
        let root = tree.root();
        assert_eq!(tree.attrs(root)?.bgcolor, Some(Color::BLACK));
        tree.apply_settings(root, &Settings::from_json(r#"{"bgcolor": null}"#)?)?;
        assert_eq!(tree.attrs(root)?.bgcolor, None);
        Ok(())
    }
}
