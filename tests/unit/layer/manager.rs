use super::*;
use crate::animation::phase::AnimationPhase;
use crate::animation::timeline::Timeline;
use crate::assets::color::ColorDef;
use crate::entity::EntityKind;
use crate::entity::text::TextEntity;
use crate::entity::timer::TimerEntity;
use crate::entity::vignette::VignetteEntity;
use crate::layer::model::LayerKind;

const CANVAS: Canvas = Canvas {
    width: 320,
    height: 180,
};

fn config() -> StageConfig {
    StageConfig {
        baseline: CANVAS,
        ..StageConfig::default()
    }
}

fn manager() -> LayerManager {
    LayerManager::new(CANVAS, config()).unwrap()
}

fn idle() -> Timeline {
    Timeline::new(vec![AnimationPhase::new("idle", 1.0)], 1.0 / 60.0).unwrap()
}

// "Hi" at 16px measures 16x20 without a font.
fn text(id: &str, layer: LayerId, anchor: Anchor) -> Entity {
    let kind = EntityKind::Text(TextEntity::new("Hi").with_font_size(16.0));
    Entity::new(id, layer, kind, idle()).with_anchor(anchor)
}

fn timer(id: &str, layer: LayerId) -> Entity {
    Entity::new(id, layer, EntityKind::Timer(TimerEntity::new(10.0)), idle())
}

#[test]
fn layers_are_created_in_z_order() {
    let m = manager();
    let ids: Vec<_> = m.layers().iter().map(|l| l.id()).collect();
    assert_eq!(ids, LayerId::ALL.to_vec());
    assert_eq!(m.layer(LayerId::Background).kind(), LayerKind::Static);
    assert!(m.needs_layout());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = StageConfig {
        fps: 0.0,
        ..config()
    };
    assert!(LayerManager::new(CANVAS, cfg).unwrap_err().is_config());
}

#[test]
fn set_entity_routes_to_declared_layer() {
    let mut m = manager();
    m.set_entity(timer("clock", LayerId::Ui)).unwrap();
    assert!(m.layer(LayerId::Ui).contains("clock"));
    assert!(!m.layer(LayerId::Game).contains("clock"));
    assert!(m.has_entity_by_id("clock"));
    // Geometry is computed on insert.
    assert_eq!(m.entity("clock").unwrap().width(), 20.0);
}

#[test]
fn set_entity_moves_id_between_layers() {
    let mut m = manager();
    m.set_entity(timer("clock", LayerId::Game)).unwrap();
    m.set_entity(timer("clock", LayerId::Ui)).unwrap();
    assert!(!m.layer(LayerId::Game).contains("clock"));
    assert_eq!(m.layer(LayerId::Ui).len(), 1);
}

#[test]
fn text_is_stacked_on_render() {
    let mut m = manager();
    m.set_entity(text("a", LayerId::Ui, Anchor::Top)).unwrap();
    m.set_entity(text("b", LayerId::Ui, Anchor::Top)).unwrap();
    assert!(m.needs_layout());

    m.render().unwrap();
    assert!(!m.needs_layout());
    assert_eq!(m.entity("a").unwrap().y(), 32.0);
    assert_eq!(m.entity("b").unwrap().y(), 32.0 + 20.0 + 16.0);
}

#[test]
fn layout_spans_layers_in_z_order() {
    let mut m = manager();
    m.set_entity(text("ui", LayerId::Ui, Anchor::Top)).unwrap();
    m.set_entity(text("bg", LayerId::Background, Anchor::Top)).unwrap();
    m.update_layout().unwrap();
    assert_eq!(m.entity("bg").unwrap().y(), 32.0);
    assert_eq!(m.entity("ui").unwrap().y(), 68.0);
}

#[test]
fn changed_text_schedules_layout() {
    let mut m = manager();
    m.set_entity(text("a", LayerId::Ui, Anchor::Center)).unwrap();
    m.update(0.0).unwrap();
    m.render().unwrap();
    assert!(!m.needs_layout());

    m.get_entity_by_id("a").unwrap().set_text("Hello").unwrap();
    m.update(1.0 / 60.0).unwrap();
    assert!(m.needs_layout());
    m.render().unwrap();
    assert_eq!(m.entity("a").unwrap().width(), 40.0);
}

#[test]
fn update_skips_static_entities() {
    let mut m = manager();
    m.set_entity(timer("bg-clock", LayerId::Background)).unwrap();
    m.set_entity(timer("clock", LayerId::Game)).unwrap();
    m.update(0.0).unwrap();
    assert_eq!(m.entity("bg-clock").unwrap().timeline().progress(), 0.0);
    assert!(m.entity("clock").unwrap().timeline().progress() > 0.0);
    assert!(!m.layer(LayerId::Background).should_update());
}

#[test]
fn get_entities_by_type_filters_all_layers() {
    let mut m = manager();
    m.set_entity(timer("t1", LayerId::Game)).unwrap();
    m.set_entity(text("label", LayerId::Ui, Anchor::Top)).unwrap();
    m.set_entity(timer("t2", LayerId::Ui)).unwrap();
    let timers = m.get_entities_by_type(EntityType::Timer);
    let ids: Vec<_> = timers.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
    assert!(m.get_entities_by_type(EntityType::Sprite).is_empty());
}

#[test]
fn remove_entity_detaches() {
    let mut m = manager();
    m.set_entity(text("a", LayerId::Ui, Anchor::Top)).unwrap();
    m.render().unwrap();
    let mut e = m.remove_entity("a").unwrap();
    e.destroy();
    assert!(!m.has_entity_by_id("a"));
    assert!(m.needs_layout());
    assert!(m.remove_entity("a").is_none());
}

#[test]
fn resize_rescales_geometry() {
    let mut m = manager();
    m.set_entity(timer("clock", LayerId::Game)).unwrap();
    m.render().unwrap();
    m.resize(Canvas::new(640, 360)).unwrap();
    assert_eq!(m.viewport().width, 640.0);
    assert_eq!(m.layer(LayerId::Game).surface().width(), 640);
    assert_eq!(m.entity("clock").unwrap().width(), 40.0);
    assert!(m.needs_layout());
    assert!(m.layer(LayerId::Background).should_render());
    assert!(m.resize(Canvas::new(0, 10)).is_err());
}

#[test]
fn composite_stacks_layers_over_clear_color() {
    let cfg = StageConfig {
        clear_color: Some(ColorDef::rgba(0.0, 0.0, 1.0, 1.0)),
        ..config()
    };
    let mut m = LayerManager::new(CANVAS, cfg).unwrap();
    let frame = m.composite().unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 255, 255]));

    let shade = Entity::new(
        "shade",
        LayerId::Background,
        EntityKind::Vignette(VignetteEntity::new(ColorDef::BLACK).with_radii(0.0, 0.5)),
        Timeline::new(Vec::new(), 1.0 / 60.0).unwrap(),
    );
    m.set_entity(shade).unwrap();
    m.render().unwrap();
    let frame = m.composite().unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!((frame.width, frame.height), (320, 180));
}

#[test]
fn clear_drops_everything() {
    let mut m = manager();
    m.set_entity(timer("a", LayerId::Game)).unwrap();
    m.set_entity(text("b", LayerId::Ui, Anchor::Top)).unwrap();
    m.clear();
    assert!(!m.has_entity_by_id("a"));
    assert!(m.layers().iter().all(|l| l.is_empty()));
}
