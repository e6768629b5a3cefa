//! Composite renderers for game nodes.
//!
//! Each widget reads the [`Session`] for the data behind a node's payload and
//! draws through the primitives in the parent module, passing every offset
//! explicitly.

use std::f32::consts::TAU;

use super::{ArcRenderer, RectRenderer, Renderer, TextRenderer};
use crate::catalog::{rarity_color, specialization_glyph, type_glyph};
use crate::geometry::{box_contains, Point, Size};
use crate::node::{Payload, SceneNode, SlotKind};
use crate::session::Session;
use crate::surface::{Color, DrawSurface, TextAlign, TextBaseline, TextStyle};

fn centered(px: u32, color: &str) -> TextStyle {
    TextStyle::new(px, "Arial", color)
        .with_align(TextAlign::Center)
        .with_baseline(TextBaseline::Middle)
}

/// Empty or occupied container slot.
///
/// Owned slots are outlined in the owner's color; offer slots are neutral.
/// While a drag is in flight the slot under the pointer is highlighted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotRenderer;

impl Renderer<Session> for SlotRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let Some(slot) = node.slot() else {
            return;
        };
        let origin = node.screen_location();
        let fill = match slot.kind {
            SlotKind::Board => "#d8d2c0",
            SlotKind::Reserve | SlotKind::DraftReserve => "#ece7da",
            SlotKind::Offer => "#fff8dc",
        };
        let outline = slot
            .owner
            .map_or_else(|| Color::from("#b8a16a"), |owner| host.player(owner).color.clone());
        RectRenderer::filled(Color::from(fill))
            .with_stroke(outline, 2.0)
            .paint(surface, origin, node.size);

        if host.is_dragging() && box_contains(origin, node.size, host.pointer()) {
            RectRenderer::outlined(Color::from("#27ae60"), 4.0).paint(surface, origin, node.size);
        }
    }
}

/// A minion's token: rarity disc, glyph, name and health.
#[derive(Debug, Clone)]
pub struct MinionTokenRenderer {
    glyph: TextRenderer,
    caption: TextRenderer,
}

impl Default for MinionTokenRenderer {
    fn default() -> Self {
        Self {
            glyph: TextRenderer::new(centered(36, "black")),
            caption: TextRenderer::new(centered(11, "#222222")),
        }
    }
}

impl Renderer<Session> for MinionTokenRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let Payload::Minion(id) = node.payload else {
            return;
        };
        let Some(minion) = host.minion(id) else {
            return;
        };
        let origin = node.screen_location();
        let center = origin + node.size.center();
        let radius = node.size.width.min(node.size.height) / 2.0 - 4.0;

        ArcRenderer::disc(rarity_color(minion.def.rarity)).paint(surface, center, radius);
        ArcRenderer::disc(Color::from("white")).paint(surface, center, radius - 4.0);
        self.glyph
            .paint(surface, center - Point::new(0.0, 8.0), &minion.def.glyph);
        self.caption
            .paint(surface, center + Point::new(0.0, 18.0), minion.name());
        if minion.owner.is_none() {
            self.caption.paint(
                surface,
                Point::new(center.x, origin.y + node.size.height + 8.0),
                "offered",
            );
        }
    }
}

/// Stat sheet shown next to a token on the overlay.
#[derive(Debug, Clone)]
pub struct MinionInfoRenderer {
    title: TextRenderer,
    line: TextRenderer,
    line_height: f32,
}

impl Default for MinionInfoRenderer {
    fn default() -> Self {
        Self {
            title: TextRenderer::new(TextStyle::new(18, "Arial", "black")),
            line: TextRenderer::new(TextStyle::new(13, "Arial", "#333333")),
            line_height: 17.0,
        }
    }
}

impl Renderer<Session> for MinionInfoRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let Payload::Popover(id) = node.payload else {
            return;
        };
        let Some(minion) = host.minion(id) else {
            return;
        };
        let def = &minion.def;
        let origin = node.screen_location();
        RectRenderer::filled(Color::from("white"))
            .with_stroke(rarity_color(def.rarity), 3.0)
            .paint(surface, origin, node.size);

        let pad = Point::new(10.0, 8.0);
        self.title
            .paint(surface, origin + pad, &format!("{} {}", def.glyph, def.name));

        let stats = &def.stats;
        let lines = [
            format!("{} {:?} / {} {:?}", type_glyph(def.kind), def.kind, specialization_glyph(def.specialization), def.specialization),
            format!("{:?}", def.rarity),
            format!("health {} / {}", minion.health, minion.max_health()),
            format!("phy atk {}  def {}", stats.physical_attack, stats.physical_defense),
            format!("mag atk {}  def {}", stats.magic_attack, stats.magic_defense),
            format!("mana {}  speed {:.2}", stats.mana, stats.attack_speed),
        ];
        let mut at = origin + pad + Point::new(0.0, 28.0);
        for text in &lines {
            self.line.paint(surface, at, text);
            at = at + Point::new(0.0, self.line_height);
        }
    }
}

/// Player card: avatar, name and health bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerCardRenderer;

impl Renderer<Session> for PlayerCardRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let Payload::Player(id) = node.payload else {
            return;
        };
        let player = host.player(id);
        let origin = node.screen_location();
        let size = node.size;

        RectRenderer::filled(Color::from("white"))
            .with_stroke(player.color.clone(), 3.0)
            .paint(surface, origin, size);

        let avatar = TextRenderer::new(
            TextStyle::new(40, "Arial", "black").with_baseline(TextBaseline::Middle),
        );
        avatar.paint(surface, origin + Point::new(10.0, size.height / 2.0), &player.avatar);

        let name = TextRenderer::new(TextStyle::new(18, "Arial", "black"));
        name.paint(surface, origin + Point::new(70.0, 12.0), &player.name);

        let bar_origin = origin + Point::new(70.0, 40.0);
        let bar = Size::new(size.width - 80.0, 14.0);
        #[allow(clippy::cast_precision_loss)]
        let fraction = if player.max_health() == 0 {
            0.0
        } else {
            player.health() as f32 / player.max_health() as f32
        };
        RectRenderer::filled(Color::from("#dddddd")).paint(surface, bar_origin, bar);
        RectRenderer::filled(Color::from("#27ae60")).paint(
            surface,
            bar_origin,
            Size::new(bar.width * fraction, bar.height),
        );
        RectRenderer::outlined(Color::from("#555555"), 1.0).paint(surface, bar_origin, bar);

        let label = TextRenderer::new(TextStyle::new(12, "Arial", "#333333"));
        label.paint(
            surface,
            bar_origin + Point::new(0.0, bar.height + 4.0),
            &format!("{} / {}", player.health(), player.max_health()),
        );
    }
}

/// Circular countdown of the placement timer; hidden while stopped.
#[derive(Debug, Clone)]
pub struct CountdownRenderer {
    fill: Color,
    track: Color,
    digits: TextRenderer,
}

impl Default for CountdownRenderer {
    fn default() -> Self {
        Self {
            fill: Color::from("#f2994a"),
            track: Color::from("#555555"),
            digits: TextRenderer::new(centered(32, "black")),
        }
    }
}

impl Renderer<Session> for CountdownRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let timer = host.timer();
        if !timer.is_running() {
            return;
        }
        let now = host.now();
        let center = node.screen_location() + node.size.center();
        let radius = node.size.width.min(node.size.height) / 2.0;

        ArcRenderer::disc(self.fill.clone())
            .with_sweep(TAU * timer.progress_at(now))
            .paint(surface, center, radius);
        ArcRenderer {
            stroke: Some((self.track.clone(), 3.0)),
            ..ArcRenderer::default()
        }
        .paint(surface, center, radius);

        let seconds = timer.remaining_at(now).as_secs_f32().ceil();
        self.digits.paint(surface, center, &format!("{seconds:.0}"));
    }
}

/// Rectangular button with a centered label; brightens under the pointer.
#[derive(Debug, Clone)]
pub struct ButtonRenderer {
    fill: Color,
    hover: Color,
    label: TextRenderer,
}

impl Default for ButtonRenderer {
    fn default() -> Self {
        Self {
            fill: Color::from("#4f4f4f"),
            hover: Color::from("#828282"),
            label: TextRenderer::new(centered(24, "white")),
        }
    }
}

impl Renderer<Session> for ButtonRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let origin = node.screen_location();
        let fill = if box_contains(origin, node.size, host.pointer()) {
            &self.hover
        } else {
            &self.fill
        };
        RectRenderer::filled(fill.clone())
            .with_stroke(Color::from("black"), 2.0)
            .paint(surface, origin, node.size);
        if let Some(text) = &node.text {
            self.label.paint(surface, origin + node.size.center(), text);
        }
    }
}

/// Frame rate and frame counter, drawn once a frame has been recorded.
#[derive(Debug, Clone)]
pub struct StatsRenderer {
    text: TextRenderer,
}

impl Default for StatsRenderer {
    fn default() -> Self {
        Self {
            text: TextRenderer::new(TextStyle::new(16, "monospace", "black")),
        }
    }
}

impl Renderer<Session> for StatsRenderer {
    fn render(&self, host: &Session, node: &SceneNode<Session>, surface: &mut dyn DrawSurface) {
        let stats = host.stats();
        if stats.frame_count() == 0 {
            return;
        }
        let origin = node.screen_location();
        self.text.paint(
            surface,
            origin,
            &format!("  fps: {:.1}", stats.frame_rate()),
        );
        self.text.paint(
            surface,
            origin + Point::new(0.0, 20.0),
            &format!("frame: {}", stats.frame_count()),
        );
    }
}
