//! Scene Tests - Materials, Decals and Sync
//!
//! Scene behaviour observed through a real session: colour binding across
//! every segment, per-side decals and rebuild-on-change.

use std::io::Cursor;
use std::sync::Arc;

use glam::Vec3;
use image::{ImageFormat, Rgba, RgbaImage};
use tee_studio_engine::scene::{
    DECAL_RENDER_ORDER, DecalCompositor, GARMENT_RENDER_ORDER, GarmentMesh, MaterialBinder,
    MeshCache, MeshSource, Scene,
};
use tee_studio_engine::studio::config::MaterialConfig;
use tee_studio_engine::studio::{
    CandidateFile, DecalSize, GarmentColor, PreviewRegistry, SWATCHES, Side, StudioConfig,
    StudioSession,
};

fn png(name: &str) -> CandidateFile {
    png_sized(name, 16, 16)
}

fn png_sized(name: &str, width: u32, height: u32) -> CandidateFile {
    let img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    CandidateFile::new(name, "image/png", buf)
}

fn setup() -> (StudioConfig, StudioSession, PreviewRegistry, Scene) {
    let config = StudioConfig::default();
    let mesh = MeshCache::new().get(&MeshSource::Builtin).unwrap();
    let scene = Scene::new(&config, mesh, 1.6);
    let session = StudioSession::new(config.color.default_color);
    (config, session, PreviewRegistry::new(), scene)
}

// ============================================================================
// Material binding
// ============================================================================

#[test]
fn test_selected_colour_reaches_every_segment() {
    let (_, mut session, _, mut scene) = setup();
    for swatch in SWATCHES {
        session.set_color(swatch.color);
        scene.sync(&session);
        let set = scene.materials();
        assert_eq!(set.len(), scene.mesh().segment_count());
        for material in set.materials() {
            assert_eq!(material.base_color, swatch.color.to_linear(), "{}", swatch.name);
        }
    }
}

#[test]
fn test_default_colour_equals_explicit_selection() {
    let (config, session, _, mut scene) = setup();
    scene.sync(&session);
    let on_load = scene.materials().clone();

    let mut picked = StudioSession::new(GarmentColor::parse("#000000").unwrap());
    picked.set_color(GarmentColor::parse("#7C3AED").unwrap());
    let mut other = Scene::new(&config, Arc::clone(scene.mesh()), 1.6);
    other.sync(&picked);
    assert_eq!(&on_load, other.materials());
}

#[test]
fn test_colour_changes_never_rebuild_geometry() {
    let (_, mut session, _, mut scene) = setup();
    scene.sync(&session);
    let mesh = Arc::clone(scene.mesh());
    for swatch in SWATCHES.iter().cycle().take(40) {
        session.set_color(swatch.color);
        scene.sync(&session);
    }
    assert!(Arc::ptr_eq(&mesh, scene.mesh()));
    assert!(scene.material_rebuilds() <= 41);
}

#[test]
fn test_binder_uses_configured_recipe() {
    let binder = MaterialBinder::new(MaterialConfig {
        roughness: 0.2,
        metalness: 0.5,
        emissive_intensity: 0.0,
    });
    let set = binder.bind(GarmentColor::DEFAULT, &GarmentMesh::builtin_tee());
    assert!(set.is_uniform());
    assert_eq!(set.materials()[0].roughness, 0.2);
    assert_eq!(set.materials()[0].metalness, 0.5);
}

// ============================================================================
// Decals
// ============================================================================

#[test]
fn test_empty_slots_produce_no_decals() {
    let (_, session, _, mut scene) = setup();
    scene.sync(&session);
    assert_eq!(scene.decals().count(), 0);
}

#[test]
fn test_removing_one_side_keeps_the_other() {
    let (config, mut session, mut registry, mut scene) = setup();
    session.upload(Side::Front, png("f.png"), &config.intake, &mut registry).unwrap();
    session.upload(Side::Back, png("b.png"), &config.intake, &mut registry).unwrap();
    scene.sync(&session);
    assert_eq!(scene.decals().count(), 2);

    session.remove(Side::Front, &mut registry);
    let changes = scene.sync(&session);
    assert!(changes.decals);
    assert!(!changes.materials);
    let sides: Vec<Side> = scene.decals().map(|d| d.side).collect();
    assert_eq!(sides, vec![Side::Back]);
}

#[test]
fn test_size_change_keeps_anchor() {
    let (config, mut session, mut registry, mut scene) = setup();
    session.upload(Side::Back, png("b.png"), &config.intake, &mut registry).unwrap();
    scene.sync(&session);
    let before = scene.decals().next().unwrap().clone();

    session.set_size(Side::Back, DecalSize::Small);
    scene.sync(&session);
    let after = scene.decals().next().unwrap().clone();

    assert_eq!(before.anchor, after.anchor);
    assert_eq!(before.yaw, after.yaw);
    assert_eq!((after.width, after.height), (1.2, 1.2));
    assert_eq!((before.width, before.height), (2.0, 2.0));
}

#[test]
fn test_decals_face_outward_and_draw_last() {
    let (config, mut session, mut registry, mut scene) = setup();
    session.upload(Side::Front, png("f.png"), &config.intake, &mut registry).unwrap();
    session.upload(Side::Back, png("b.png"), &config.intake, &mut registry).unwrap();
    scene.sync(&session);

    for decal in scene.decals() {
        assert_eq!(decal.render_order, DECAL_RENDER_ORDER);
        assert!(decal.render_order > GARMENT_RENDER_ORDER);
        let outward = match decal.side {
            Side::Front => Vec3::Z,
            Side::Back => Vec3::NEG_Z,
        };
        assert!((decal.facing() - outward).length() < 1e-5);
        assert!(decal.anchor.dot(outward) > 0.1);
    }
}

#[test]
fn test_every_decal_size_clears_the_collar() {
    let config = StudioConfig::default();
    let mesh = GarmentMesh::builtin_tee();
    let collar = mesh.segments.iter().find(|s| s.name == "collar").unwrap();
    let collar_bottom = collar
        .vertices
        .iter()
        .map(|v| v.position[1])
        .fold(f32::INFINITY, f32::min);

    let compositor = DecalCompositor::new(config.decals.clone());
    for side in Side::ALL {
        for size in [DecalSize::Small, DecalSize::Medium, DecalSize::Large] {
            let top = compositor
                .compose(side, size, 1)
                .vertices()
                .iter()
                .map(|v| v.position[1])
                .fold(f32::NEG_INFINITY, f32::max);
            assert!(top < collar_bottom, "{side:?} {size:?} top {top} reaches collar at {collar_bottom}");
        }
    }
}

#[test]
fn test_decal_tracks_current_artwork() {
    let (config, mut session, mut registry, mut scene) = setup();
    session.upload(Side::Front, png("one.png"), &config.intake, &mut registry).unwrap();
    scene.sync(&session);
    let first = scene.decals().next().unwrap().artwork_id;

    session.upload(Side::Front, png("two.png"), &config.intake, &mut registry).unwrap();
    scene.sync(&session);
    let second = scene.decals().next().unwrap().artwork_id;
    assert_ne!(first, second);
    assert_eq!(second, session.artwork(Side::Front).unwrap().id());
}

#[test]
fn test_rejected_upload_leaves_decals_alone() {
    let (mut config, mut session, mut registry, mut scene) = setup();
    config.intake.max_texture_dimension = 32;
    session.upload(Side::Front, png("keep.png"), &config.intake, &mut registry).unwrap();
    assert!(scene.sync(&session).decals);
    let before = scene.decals().next().unwrap().artwork_id;

    let wide = png_sized("wide.png", 33, 4);
    assert!(session.upload(Side::Front, wide, &config.intake, &mut registry).is_err());

    let changes = scene.sync(&session);
    assert!(!changes.decals);
    assert!(!changes.any());
    assert_eq!(scene.decals().next().unwrap().artwork_id, before);
    assert_eq!(registry.live_count(), 1);
}

// ============================================================================
// Idle rotation
// ============================================================================

#[test]
fn test_idle_sway_is_small_and_pauses_on_drag() {
    let (_, _, _, mut scene) = setup();
    for _ in 0..600 {
        scene.advance(1.0 / 60.0);
        assert!(scene.idle().yaw().abs() <= 0.15 + 1e-6);
    }
    let yaw = scene.idle().yaw();
    scene.camera.set_orbiting(true);
    scene.advance(5.0);
    assert_eq!(scene.idle().yaw(), yaw);
    scene.camera.set_orbiting(false);
    scene.advance(0.1);
    assert_ne!(scene.idle().yaw(), yaw);
}
