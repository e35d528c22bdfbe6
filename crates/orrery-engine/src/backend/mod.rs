//! Render backend surface: sprites, containers, assets, aura handling.
//!
//! The engine only ever talks to these traits. [`HeadlessBackend`] is an
//! in-memory implementation for the CLI and tests.

mod handler;
mod headless;
mod traits;
mod types;

pub use handler::*;
pub use headless::*;
pub use traits::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_common::{EngineError, Point, Tint, Viewport};
    use orrery_config::schema::{EffectSpec, GlowEffect};

    fn backend() -> HeadlessBackend {
        HeadlessBackend::new(Viewport::new(800.0, 600.0)).with_asset_size("hand.png", 20.0, 200.0)
    }

    #[test]
    fn sprites_need_loaded_assets() {
        let mut b = backend();
        let c = b.create_container().unwrap();
        assert_eq!(
            b.create_sprite(c, "hand.png"),
            Err(BackendError::AssetNotLoaded("hand.png".into()))
        );
        assert!(b.load_assets(&["hand.png".into()]).is_empty());
        let s = b.create_sprite(c, "hand.png").unwrap();
        let state = b.sprite(s).unwrap();
        assert_eq!((state.width, state.height), (20.0, 200.0));
        assert_eq!(state.anchor, Point::new(0.5, 0.5));
        assert_eq!(b.url_of(s), Some("hand.png"));
    }

    #[test]
    fn failing_assets_are_reported() {
        let mut b = backend().with_failing_asset("broken.png");
        let failures = b.load_assets(&["broken.png".into(), "ok.png".into()]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].url, "broken.png");
        assert_eq!(b.load_calls().len(), 1);
    }

    #[test]
    fn destroying_container_removes_children() {
        let mut b = backend();
        b.load_assets(&["a.png".into()]);
        let c = b.create_container().unwrap();
        let s1 = b.create_sprite(c, "a.png").unwrap();
        let _s2 = b.create_sprite(c, "a.png").unwrap();
        assert!(b.destroy_sprite(s1));
        assert!(!b.destroy_sprite(s1));
        assert_eq!(b.sprite_count(), 1);
        assert!(b.destroy_container(c));
        assert_eq!(b.sprite_count(), 0);
        assert!(!b.destroy_container(c));
    }

    #[test]
    fn unknown_container_is_an_error() {
        let mut b = backend();
        b.load_assets(&["a.png".into()]);
        let err = b.create_sprite(ContainerHandle(999), "a.png").unwrap_err();
        assert!(matches!(err, BackendError::UnknownContainer(_)));
        let engine: EngineError = err.into();
        assert!(matches!(engine, EngineError::Backend(_)));
    }

    #[test]
    fn extensions_and_downcast() {
        let mut b = backend();
        b.load_assets(&["a.png".into()]);
        let c = b.create_container().unwrap();
        let s = b.create_sprite(c, "a.png").unwrap();
        {
            let dynb: &mut dyn RenderBackend = &mut b;
            let ext = dynb.extensions().unwrap();
            assert!(ext.set_tint(s, Tint::WHITE));
            assert!(dynb.as_any().downcast_ref::<HeadlessBackend>().is_some());
        }
        assert_eq!(b.tint_of(s), Some(Tint::WHITE));

        let mut plain = backend().without_extensions();
        assert!(plain.extensions().is_none());
    }

    #[test]
    fn default_handler_creates_tinted_aura() {
        let mut b = backend();
        b.load_assets(&["a.png".into()]);
        let c = b.create_container().unwrap();
        let owner = b.create_sprite(c, "a.png").unwrap();
        b.sprite_mut(owner).unwrap().x = 42.0;

        let mut handler = DefaultEffectHandler;
        let request = AuraRequest {
            owner,
            container: c,
            image_ref: "a.png".into(),
            kind: AuraKind::Glow,
            tint: Tint { r: 255, g: 0, b: 0 },
        };
        let aura = handler.create_aura_sprite(&mut b, &request).unwrap();
        let state = b.sprite(aura).unwrap();
        assert_eq!(state.x, 42.0);
        assert_eq!(state.alpha, 0.0);
        assert_eq!(b.tint_of(aura), Some(Tint { r: 255, g: 0, b: 0 }));

        handler.dispose_aura_sprite(&mut b, aura);
        assert!(b.sprite(aura).is_none());
    }

    #[test]
    fn recording_handler_logs_and_refuses() {
        let mut b = backend();
        b.load_assets(&["a.png".into()]);
        let c = b.create_container().unwrap();
        let owner = b.create_sprite(c, "a.png").unwrap();
        let request = AuraRequest {
            owner,
            container: c,
            image_ref: "a.png".into(),
            kind: AuraKind::Bloom,
            tint: Tint::WHITE,
        };

        let mut refusing = RecordingEffectHandler::refusing();
        assert!(refusing.create_aura_sprite(&mut b, &request).is_none());

        let mut handler = RecordingEffectHandler::new();
        let log = handler.log();
        let aura = handler.create_aura_sprite(&mut b, &request).unwrap();
        let glow = EffectSpec::Glow(GlowEffect::default());
        handler.apply_advanced_effect(&mut b, aura, &glow, 0.5);
        handler.dispose_aura_sprite(&mut b, aura);

        let log = log.borrow();
        assert_eq!(log.created, vec![aura]);
        assert_eq!(log.applied, vec![(aura, "glow")]);
        assert_eq!(log.disposed, vec![aura]);
    }
}
