use panelglow_core::{
    distance, EffectConfig, LayoutGraph, Palette, Panel, Rgb, SpectralFrame, Vec2, FFT_BINS,
};
use panelglow_effects::{
    LightEffect, LightSource, LightSourceField, SoftLightning, SpatialDiffusionRenderer,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Deterministic source returning the same word forever
struct ConstRng(u32);

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.0) << 32) | u64::from(self.0)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0 as u8);
    }
}

fn cross_layout() -> LayoutGraph {
    LayoutGraph::new(
        vec![
            Panel::new(1, 100.0, 100.0),
            Panel::new(2, 13.4, 100.0),
            Panel::new(3, 186.6, 100.0),
            Panel::new(4, 100.0, 25.0),
            Panel::new(5, 100.0, 175.0),
        ],
        Vec2::new(100.0, 100.0),
    )
    .unwrap()
}

fn primary_palette() -> Palette {
    Palette::new(vec![
        Rgb::new(255, 0, 0),
        Rgb::new(0, 255, 0),
        Rgb::new(0, 0, 255),
    ])
    .unwrap()
}

fn ambient_field(color: Rgb) -> LightSourceField {
    LightSourceField::new(&cross_layout(), &EffectConfig::default(), color)
}

fn loud_frame(peak: usize) -> SpectralFrame {
    let mut bins = [0u8; FFT_BINS];
    bins[peak] = 40;
    SpectralFrame::with_bins(bins, 500)
}

#[test]
fn test_ambient_only_field_renders_ambient_everywhere() {
    let ambient = Rgb::new(12, 200, 77);
    let field = ambient_field(ambient);
    let renderer = SpatialDiffusionRenderer::new(86.6);

    for panel in cross_layout().panels() {
        assert_eq!(renderer.shade(&field, panel.centroid), ambient);
    }
}

#[test]
fn test_spawn_edge_follows_draw() {
    let mut field = ambient_field(Rgb::BLACK);

    // Draw near 1.0: bottom edge, moving up
    let light = *field.spawn(&mut ConstRng(u32::MAX));
    assert_eq!(light.position.y, 25.0);
    assert_eq!(light.direction, Vec2::new(0.0, 1.0));
    assert!(light.position.x >= 13.4 && light.position.x <= 186.6);

    // Draw of 0.0: top edge, moving down, at the left of the X range
    let light = *field.spawn(&mut ConstRng(0));
    assert_eq!(light.position.y, 175.0);
    assert_eq!(light.direction, Vec2::new(0.0, -1.0));
    assert_eq!(light.position.x, 13.4);
    assert_eq!(light.radius, 1.0);
}

#[test]
fn test_spawn_at_capacity_keeps_newest() {
    let mut field = ambient_field(Rgb::BLACK);
    let mut rng = StdRng::seed_from_u64(21);

    field.spawn(&mut rng);
    let newest = *field.spawn(&mut rng);

    assert_eq!(field.len(), 2);
    assert_eq!(field.transients(), &[newest]);
}

#[test]
fn test_larger_capacity_evicts_oldest_first() {
    let config = EffectConfig {
        max_sources: 3,
        ..Default::default()
    };
    let mut field = LightSourceField::new(&cross_layout(), &config, Rgb::BLACK);
    let mut rng = StdRng::seed_from_u64(4);

    let _first = *field.spawn(&mut rng);
    let second = *field.spawn(&mut rng);
    let third = *field.spawn(&mut rng);

    assert_eq!(field.transients(), &[second, third]);
}

#[test]
fn test_light_past_despawn_distance_is_removed() {
    let mut field = ambient_field(Rgb::BLACK);
    field.spawn(&mut ConstRng(0));
    let limit = 10.0 * 86.6;

    let mut steps = 0;
    while !field.transients().is_empty() {
        field.propagate();
        steps += 1;
        for light in field.transients() {
            assert!(distance(field.center(), light.position) <= limit);
        }
        assert!(steps < 20, "light never left the layout");
    }
    // From y=175 moving down 173.2 per step, distance passes 866 on step 6
    assert_eq!(steps, 6);
    assert_eq!(field.len(), 1);
}

#[test]
fn test_light_brightens_nearby_panels() {
    let mut field = ambient_field(Rgb::BLACK);
    field.spawn(&mut ConstRng(0));
    let light = field.transients()[0];
    let renderer = SpatialDiffusionRenderer::new(86.6);

    // A point exactly one radius away gets the full light color
    let on_rim = light.position + Vec2::new(0.0, -86.6);
    assert_eq!(renderer.shade(&field, on_rim), Rgb::WHITE);

    let near = renderer.shade(&field, light.position + Vec2::new(0.0, -150.0));
    let far = renderer.shade(&field, light.position + Vec2::new(0.0, -600.0));
    assert!(near.r > far.r);
    assert_eq!(near.r, near.g);
    assert_eq!(near.g, near.b);
}

#[test]
fn test_white_over_white_stays_white() {
    let mut field = ambient_field(Rgb::WHITE);
    field.spawn(&mut ConstRng(0));
    let origin = field.transients()[0].position;
    let renderer = SpatialDiffusionRenderer::new(86.6);

    for step in 0..2000 {
        let point = origin + Vec2::new(0.0, -0.7 * step as f32);
        assert_eq!(renderer.shade(&field, point), Rgb::WHITE, "step {}", step);
    }
}

fn colored_light(y: f32, color: Rgb) -> LightSource {
    LightSource {
        position: Vec2::new(0.0, y),
        direction: Vec2::new(0.0, 1.0),
        speed: 173.2,
        radius: 1.0,
        color,
    }
}

#[test]
fn test_blend_follows_creation_order() {
    let config = EffectConfig {
        max_sources: 3,
        ..Default::default()
    };
    let renderer = SpatialDiffusionRenderer::new(86.6);
    // Two tiles away: factor 0.4. One tile away: factor 1.
    let red = colored_light(173.2, Rgb::new(255, 0, 0));
    let blue = colored_light(86.6, Rgb::new(0, 0, 255));

    let mut field = LightSourceField::new(&cross_layout(), &config, Rgb::BLACK);
    field.push(red);
    field.push(blue);
    assert_eq!(renderer.shade(&field, Vec2::ZERO), Rgb::new(0, 0, 255));

    let mut reversed = LightSourceField::new(&cross_layout(), &config, Rgb::BLACK);
    reversed.push(blue);
    reversed.push(red);
    assert_eq!(renderer.shade(&reversed, Vec2::ZERO), Rgb::new(102, 0, 153));
}

#[test]
fn test_starts_dark() {
    let mut effect =
        SoftLightning::new(cross_layout(), primary_palette(), EffectConfig::default().with_seed(5))
            .unwrap();
    let records = effect.render(&SpectralFrame::silent());
    assert!(records.iter().all(|r| r.color == Rgb::BLACK));
}

#[test]
fn test_recolor_waits_for_gate() {
    let mut effect =
        SoftLightning::new(cross_layout(), primary_palette(), EffectConfig::default().with_seed(1))
            .unwrap();
    effect.start();
    assert_eq!(effect.strategy().field().ambient().color, Rgb::BLACK);

    // First invocation is gated: the beat is ignored
    effect.render(&loud_frame(1).beat(true));
    assert_eq!(effect.strategy().field().ambient().color, Rgb::BLACK);

    // Second is admitted: mean dominant index 1 selects green
    effect.render(&loud_frame(1).beat(true));
    assert_eq!(
        effect.strategy().field().ambient().color,
        Rgb::new(0, 255, 0)
    );
}

#[test]
fn test_gated_frame_keeps_lights_in_place() {
    let mut effect =
        SoftLightning::new(cross_layout(), primary_palette(), EffectConfig::default().with_seed(6))
            .unwrap();

    // Frame 1 is gated: the light spawns but does not move
    effect.render(&SpectralFrame::silent().onset(true));
    let spawned = effect.strategy().field().transients()[0];
    let records = effect.render(&SpectralFrame::silent());

    // Frame 2 is admitted: rendered from the unmoved light, then advanced
    let moved = effect.strategy().field().transients()[0];
    assert_eq!(moved.position.x, spawned.position.x);
    let expected = spawned.position.y + spawned.direction.y * 2.0 * 86.6;
    assert!((moved.position.y - expected).abs() < 1e-3);

    let renderer = SpatialDiffusionRenderer::new(86.6);
    let mut unmoved = LightSourceField::new(&cross_layout(), &EffectConfig::default(), Rgb::BLACK);
    unmoved.push(spawned);
    for (record, panel) in records.iter().zip(cross_layout().panels()) {
        assert_eq!(record.color, renderer.shade(&unmoved, panel.centroid));
    }
}

#[test]
fn test_onset_spawns_light_every_frame() {
    let mut effect =
        SoftLightning::new(cross_layout(), primary_palette(), EffectConfig::default().with_seed(2))
            .unwrap();
    effect.start();

    for _ in 0..6 {
        effect.render(&loud_frame(0).onset(true));
        assert_eq!(effect.strategy().field().transients().len(), 1);
    }
}

#[test]
fn test_onset_skip_frames_gates_spawning() {
    let mut config = EffectConfig::default().with_seed(8);
    config.onset.skip_frames = 2;
    let mut effect = SoftLightning::new(cross_layout(), primary_palette(), config).unwrap();

    let mut counts = Vec::new();
    for _ in 0..3 {
        effect.render(&SpectralFrame::silent().onset(true));
        counts.push(effect.strategy().field().transients().len());
    }
    assert_eq!(counts, vec![0, 0, 1]);
}

#[test]
fn test_quiet_frames_render_ambient() {
    let mut effect =
        SoftLightning::new(cross_layout(), primary_palette(), EffectConfig::default().with_seed(3))
            .unwrap();
    effect.start();

    for _ in 0..4 {
        let records = effect.render(&loud_frame(2));
        assert!(records.iter().all(|r| r.color == Rgb::BLACK));
    }
}

#[test]
fn test_stop_leaves_lights_alone() {
    let mut effect =
        SoftLightning::new(cross_layout(), primary_palette(), EffectConfig::default().with_seed(4))
            .unwrap();
    effect.start();
    effect.render(&SpectralFrame::silent().onset(true));
    let before = effect.strategy().field().sources().to_vec();

    effect.stop();
    assert_eq!(effect.strategy().field().sources(), before.as_slice());
}

proptest! {
    #[test]
    fn prop_ambient_only_matches_ambient(
        points in prop::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..50),
        r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
    ) {
        let panels = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Panel::new(i as u32, x, y))
            .collect();
        let layout = LayoutGraph::centered(panels).unwrap();
        let ambient = Rgb::new(r, g, b);
        let field = LightSourceField::new(&layout, &EffectConfig::default(), ambient);
        let renderer = SpatialDiffusionRenderer::new(86.6);

        for panel in layout.panels() {
            prop_assert_eq!(renderer.shade(&field, panel.centroid), ambient);
        }
    }

    #[test]
    fn prop_field_never_exceeds_capacity(ops in prop::collection::vec(any::<bool>(), 1..200), seed in any::<u64>()) {
        let mut field = ambient_field(Rgb::BLACK);
        let mut rng = StdRng::seed_from_u64(seed);
        let center = field.center();

        for spawn in ops {
            if spawn {
                field.spawn(&mut rng);
            } else {
                field.propagate();
                for light in field.transients() {
                    prop_assert!(distance(center, light.position) <= 866.0 + 1e-3);
                }
            }
            prop_assert!(field.len() <= 2);
            prop_assert_eq!(field.ambient().position, center);
        }
    }
}
