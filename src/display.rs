//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game.  No game logic is performed; this module only projects the
//! y-up world onto the terminal grid.

use std::collections::HashSet;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use rainmaker::audio::{Cue, Mixer, Playback};
use rainmaker::blimp::{Blimp, BlimpState};
use rainmaker::cloud::Cloud;
use rainmaker::entity::{EntityId, GameObject};
use rainmaker::game::{Game, RoundOutcome, Status};
use rainmaker::geometry::Vec2;
use rainmaker::helicopter::{HeliState, Helicopter, Rotor};
use rainmaker::pond::Pond;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkYellow;
const C_HUD_FUEL: Color = Color::Red;
const C_HUD_WATER: Color = Color::Cyan;
const C_HUD_STATE: Color = Color::White;
const C_HELIPAD: Color = Color::Grey;
const C_POND: Color = Color::Blue;
const C_POND_TEXT: Color = Color::White;
const C_CLOUD_TEXT: Color = Color::Blue;
const C_BLIMP: Color = Color::Magenta;
const C_BLIMP_FUEL: Color = Color::Cyan;
const C_HELICOPTER: Color = Color::Yellow;
const C_BOUND: Color = Color::Yellow;
const C_LINE: Color = Color::White;
const C_CAPTION: Color = Color::DarkCyan;
const C_HINT: Color = Color::DarkGrey;

// ── Sound stand-in ────────────────────────────────────────────────────────────

/// Tracks running loops and shows the latest one-shot as a HUD caption in
/// place of real audio output.
#[derive(Default)]
pub struct TerminalMixer {
    looping: HashSet<(EntityId, Cue)>,
    caption: Option<(Cue, u32)>,
}

/// Frames a one-shot caption stays on screen.
const CAPTION_FRAMES: u32 = 45;

impl TerminalMixer {
    /// Ages the caption by one frame.
    pub fn tick(&mut self) {
        if let Some((_, frames)) = &mut self.caption {
            *frames = frames.saturating_sub(1);
            if *frames == 0 {
                self.caption = None;
            }
        }
    }

    fn caption(&self) -> Option<&'static str> {
        self.caption.map(|(cue, _)| match cue {
            Cue::HeliStartup => "♪ engine starting",
            Cue::HeliShutdown => "♪ engine winding down",
            Cue::Thunder => "⚡ THUNDER",
            Cue::Seeding => "♪ psst, seeding",
            Cue::Refueling => "♪ glug glug, refuelling",
            Cue::HeliHum | Cue::BlimpEngine | Cue::Wind | Cue::Rain => "",
        })
    }

    fn is_raining(&self) -> bool {
        self.looping.iter().any(|(_, cue)| *cue == Cue::Rain)
    }
}

impl Mixer for TerminalMixer {
    fn play(&mut self, source: EntityId, cue: Cue, playback: Playback) {
        match playback {
            Playback::Looping => {
                self.looping.insert((source, cue));
            }
            Playback::Once => self.caption = Some((cue, CAPTION_FRAMES)),
        }
    }

    fn stop(&mut self, source: EntityId, cue: Cue) {
        self.looping.remove(&(source, cue));
    }

    fn is_playing(&self, source: EntityId, cue: Cue) -> bool {
        self.looping.contains(&(source, cue))
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps world coordinates into the bordered play area (rows 2 .. h-3).
struct Viewport {
    width: u16,
    height: u16,
    world_w: f64,
    world_h: f64,
}

impl Viewport {
    fn cols(&self) -> f64 {
        f64::from(self.width.saturating_sub(2).max(1))
    }

    fn rows(&self) -> f64 {
        f64::from(self.height.saturating_sub(4).max(1))
    }

    /// `None` when the point falls outside the play area.
    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let col = (p.x / self.world_w * self.cols()).floor();
        let row = ((1.0 - p.y / self.world_h) * self.rows()).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols() || row >= self.rows() {
            return None;
        }
        Some((col as u16 + 1, row as u16 + 2))
    }

    fn span_x(&self, world: f64) -> u16 {
        (world / self.world_w * self.cols()).round().max(1.0) as u16
    }

    fn span_y(&self, world: f64) -> u16 {
        (world / self.world_h * self.rows()).round().max(1.0) as u16
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game, mixer: &TerminalMixer) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport {
        width,
        height,
        world_w: game.config().width,
        world_h: game.config().height,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, &view, game, mixer)?;
    draw_helipad(out, &view, game)?;

    for pond in game.ponds() {
        draw_pond(out, &view, pond)?;
    }
    for blimp in game.blimps() {
        draw_blimp(out, &view, blimp)?;
    }
    draw_helicopter(out, &view, game.helicopter(), game.config().effectively_zero)?;
    for cloud in game.clouds() {
        draw_cloud(out, &view, cloud)?;
    }

    if game.lines().is_visible() {
        draw_distance_lines(out, &view, game)?;
    }
    if game.bounds().is_visible() {
        draw_bounds(out, &view, game)?;
    }

    draw_controls_hint(out, &view)?;

    if let Status::Concluded(outcome) = game.status() {
        draw_outcome(out, &view, &outcome)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: &Viewport,
    game: &Game,
    mixer: &TerminalMixer,
) -> std::io::Result<()> {
    let heli = game.helicopter();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_FUEL))?;
    out.queue(Print(format!("F:{:>6.0}", heli.fuel())))?;

    out.queue(style::SetForegroundColor(C_HUD_WATER))?;
    out.queue(Print(format!(
        "  Water:{:>4.0}%/{:.0}%",
        game.ponds().total_capacity() * 100.0,
        game.config().win_capacity * 100.0
    )))?;

    out.queue(style::SetForegroundColor(C_HUD_STATE))?;
    let state = match heli.state() {
        HeliState::Off => "OFF",
        HeliState::Starting => "STARTING",
        HeliState::Ready => "READY",
        HeliState::Stopping => "STOPPING",
    };
    out.queue(Print(format!(
        "  [{state}] spd {:>4.1} hdg {:>3.0}°  wind {:.2}",
        heli.speed(),
        heli.heading(),
        game.wind().speed()
    )))?;

    let caption = mixer.caption().filter(|c| !c.is_empty()).or(mixer.is_raining().then_some("♪ rain"));
    if let Some(caption) = caption {
        let x = view.width.saturating_sub(caption.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_CAPTION))?;
        out.queue(Print(caption))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_helipad<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    let pad = game.helipad();
    let size = pad.size();
    let top_left = Vec2::new(pad.position().x - size.x / 2.0, pad.position().y + size.y / 2.0);
    let Some((x, y)) = view.cell(top_left) else {
        return Ok(());
    };
    let w = view.span_x(size.x).max(3) as usize;
    let h = view.span_y(size.y).max(2);

    out.queue(style::SetForegroundColor(C_HELIPAD))?;
    for row in 0..h {
        let line = if row == h / 2 {
            let pad_left = (w - 1) / 2;
            format!("{}H{}", "░".repeat(pad_left), "░".repeat(w - 1 - pad_left))
        } else {
            "░".repeat(w)
        };
        out.queue(cursor::MoveTo(x, y + row))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

fn draw_pond<W: Write>(out: &mut W, view: &Viewport, pond: &Pond) -> std::io::Result<()> {
    let Some((x, y)) = view.cell(pond.position()) else {
        return Ok(());
    };
    let half = (view.span_x(pond.current_radius() * 2.0) / 2).max(1);
    let water = "≈".repeat(usize::from(half) * 2 + 1);

    out.queue(style::SetForegroundColor(C_POND))?;
    out.queue(cursor::MoveTo(x.saturating_sub(half).max(1), y))?;
    out.queue(Print(&water))?;

    let label = pond.percent_label();
    out.queue(cursor::MoveTo(x.saturating_sub(label.len() as u16 / 2).max(1), y + 1))?;
    out.queue(style::SetForegroundColor(C_POND_TEXT))?;
    out.queue(Print(label))?;
    Ok(())
}

/// Shade deepens with saturation:  ░ (dry)  ▒  ▓ (raining)
fn draw_cloud<W: Write>(out: &mut W, view: &Viewport, cloud: &Cloud) -> std::io::Result<()> {
    let Some((x, y)) = view.cell(cloud.position()) else {
        return Ok(());
    };
    let seed = cloud.seed_percentage();
    let shade = match seed {
        0..=9 => "░",
        10..=29 => "▒",
        _ => "▓",
    };
    let c = cloud.color();
    let w = view.span_x(cloud.width()).max(3);
    let left = x.saturating_sub(w / 2).max(1);

    out.queue(style::SetForegroundColor(Color::Rgb { r: c.r, g: c.g, b: c.b }))?;
    out.queue(cursor::MoveTo(left, y))?;
    out.queue(Print(shade.repeat(usize::from(w))))?;

    let label = cloud.saturation_label();
    out.queue(cursor::MoveTo(x.saturating_sub(label.len() as u16 / 2).max(1), y))?;
    out.queue(style::SetForegroundColor(C_CLOUD_TEXT))?;
    out.queue(Print(label))?;
    Ok(())
}

fn draw_blimp<W: Write>(out: &mut W, view: &Viewport, blimp: &Blimp) -> std::io::Result<()> {
    if !matches!(blimp.state(), BlimpState::InView { .. }) {
        return Ok(());
    }
    let Some((x, y)) = view.cell(blimp.position()) else {
        return Ok(());
    };
    //   ✣(=====)    ← tail rotor + envelope
    let body = "✣(=====)";
    out.queue(style::SetForegroundColor(C_BLIMP))?;
    out.queue(cursor::MoveTo(x.saturating_sub(4).max(1), y))?;
    out.queue(Print(body))?;

    let fuel = blimp.fuel_label();
    out.queue(cursor::MoveTo(x.saturating_sub(fuel.len() as u16 / 2).max(1), y + 1))?;
    out.queue(style::SetForegroundColor(C_BLIMP_FUEL))?;
    out.queue(Print(fuel))?;
    Ok(())
}

/// Blade glyph for the current rotor angle, or `+` for a rotor at rest.
fn rotor_glyph(rotor: &Rotor, effectively_zero: f64) -> char {
    if !rotor.is_rotating(effectively_zero) {
        return '+';
    }
    match (rotor.angle() / 45.0) as usize % 4 {
        0 => '|',
        1 => '/',
        2 => '─',
        _ => '\\',
    }
}

fn draw_helicopter<W: Write>(
    out: &mut W,
    view: &Viewport,
    heli: &Helicopter,
    effectively_zero: f64,
) -> std::io::Result<()> {
    let Some((x, y)) = view.cell(heli.position()) else {
        return Ok(());
    };
    // Eight-way nose glyph from the clockwise-from-up heading.
    let glyphs = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];
    let sector = ((heli.heading() + 22.5).rem_euclid(360.0) / 45.0) as usize % 8;
    let blade = rotor_glyph(heli.rotor(), effectively_zero);

    out.queue(style::SetForegroundColor(C_HELICOPTER))?;
    out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), y))?;
    out.queue(Print(format!("{blade}{}{blade}", glyphs[sector])))?;
    Ok(())
}

fn draw_bounds<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BOUND))?;
    for bound in game.bounds().iter() {
        let (x0, y0, x1, y1) = bound.shape().aabb(bound.center());
        for corner in [Vec2::new(x0, y0), Vec2::new(x0, y1), Vec2::new(x1, y0), Vec2::new(x1, y1)] {
            if let Some((cx, cy)) = view.cell(corner) {
                out.queue(cursor::MoveTo(cx, cy))?;
                out.queue(Print("+"))?;
            }
        }
    }
    Ok(())
}

fn draw_distance_lines<W: Write>(out: &mut W, view: &Viewport, game: &Game) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LINE))?;
    for line in game.lines().iter() {
        let steps = 12;
        for i in 1..steps {
            let t = f64::from(i) / f64::from(steps);
            let p = Vec2::new(
                line.start().x + (line.end().x - line.start().x) * t,
                line.start().y + (line.end().y - line.start().y) * t,
            );
            if let Some((cx, cy)) = view.cell(p) {
                out.queue(cursor::MoveTo(cx, cy))?;
                out.queue(Print("·"))?;
            }
        }
        if let Some((cx, cy)) = view.cell(line.midpoint()) {
            out.queue(cursor::MoveTo(cx, cy))?;
            out.queue(Print(line.label()))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←→ Turn  ↑↓ Throttle  SPACE Seed  I Ignition  B Bounds  D Lines  R Restart  Q Quit",
    ))?;
    Ok(())
}

// ── Round-over overlay ────────────────────────────────────────────────────────

fn draw_outcome<W: Write>(out: &mut W, view: &Viewport, outcome: &RoundOutcome) -> std::io::Result<()> {
    let (title, detail, color) = match outcome {
        RoundOutcome::Won { score } => (
            "║  MISSION SUCCESS   ║",
            format!("You scored {:.0} points", score),
            Color::Green,
        ),
        RoundOutcome::Lost => (
            "║  MISSION FAILURE   ║",
            "The drought holds the valley".to_string(),
            Color::Red,
        ),
    };
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", color),
        (title, color),
        ("╚════════════════════╝", color),
    ];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(3);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let detail_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(detail.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, detail_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&detail))?;

    let hint = "Another go, pilot?  Y - Yes   N - No";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, detail_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainmaker::audio::Silence;
    use rainmaker::config::Config;
    use rainmaker::helicopter::Handling;

    fn spun_up_heli(config: &Config) -> Helicopter {
        let handling = Handling {
            rotor_acceleration: 1.0,
            ..Handling::from(config)
        };
        let mut heli = Helicopter::new(EntityId(0), config.helipad_position, config.starting_fuel, handling);
        heli.toggle_ignition(&mut Silence);
        heli.update(&mut Silence);
        heli
    }

    #[test]
    fn resting_rotor_draws_a_hub() {
        assert_eq!(rotor_glyph(&Rotor::default(), 1e-3), '+');
    }

    #[test]
    fn rotor_glyph_follows_the_configured_threshold() {
        let config = Config::default();
        let heli = spun_up_heli(&config);
        assert_eq!(heli.rotor().speed(), 1.0);

        assert_ne!(rotor_glyph(heli.rotor(), config.effectively_zero), '+');
        // A slow rotor under a coarse threshold counts as stopped.
        assert_eq!(rotor_glyph(heli.rotor(), 2.0), '+');
    }
}
