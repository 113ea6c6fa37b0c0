/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable `FrameView`.  No
/// game logic is performed; this module only maps field coordinates (percent
/// across, pixels down) onto terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use cosmic_defender::snapshot::{FrameView, SpriteKind, SpriteView};
use cosmic_defender::entities::SessionStatus;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_TIMER: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_PARTICLE: Color = Color::DarkYellow;
const C_EXPLOSION: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Terminal area the play field is drawn into.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub width: u16,
    pub height: u16,
}

impl Screen {
    /// First and last rows inside the border.
    fn play_rows(&self) -> (u16, u16) {
        (2, self.height.saturating_sub(3))
    }

    fn column(&self, x_percent: f32) -> u16 {
        let inner = self.width.saturating_sub(3) as f32;
        1 + (x_percent.clamp(0.0, 100.0) / 100.0 * inner).round() as u16
    }

    /// `None` when `y` lies above or below the visible field.
    fn row(&self, y_px: f32, field_height: f32) -> Option<u16> {
        if y_px < 0.0 || field_height <= 0.0 {
            return None;
        }
        let (top, bottom) = self.play_rows();
        let span = (bottom.saturating_sub(top) + 1) as f32;
        let row = top + (y_px / field_height * span) as u16;
        (row <= bottom).then_some(row)
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, view: &FrameView, screen: Screen) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, screen)?;
    draw_hud(out, view, screen)?;

    for sprite in view.sprites_of(SpriteKind::Particle) {
        draw_sprite(out, sprite, view, screen)?;
    }
    for sprite in view.sprites_of(SpriteKind::Enemy) {
        draw_enemy(out, sprite, view, screen)?;
    }
    for sprite in view.sprites_of(SpriteKind::Bullet) {
        draw_sprite(out, sprite, view, screen)?;
    }
    for sprite in view.sprites_of(SpriteKind::Explosion) {
        draw_sprite(out, sprite, view, screen)?;
    }

    draw_player(out, view, screen)?;
    draw_controls_hint(out, screen)?;

    match view.status {
        SessionStatus::Idle => draw_start_screen(out, screen)?,
        SessionStatus::GameOver => draw_game_over(out, view, screen)?,
        SessionStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Convert a mouse drag in columns to a move delta in percent units.
pub fn columns_to_percent(delta_columns: i32, screen: Screen) -> f32 {
    let inner = screen.width.saturating_sub(3).max(1) as f32;
    delta_columns as f32 * 100.0 / inner
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: Screen) -> std::io::Result<()> {
    let w = screen.width as usize;
    let h = screen.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &FrameView, screen: Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", view.score)))?;

    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("  Level:{:>2}", view.level)))?;

    let timer = format!("[ {} ]", view.timer);
    let tx = (screen.width / 2).saturating_sub(timer.len() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIMER))?;
    out.queue(Print(&timer))?;

    let lives_str = format!("Lives:{}", "♥".repeat(view.lives as usize));
    let rx = screen
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &FrameView, screen: Screen) -> std::io::Result<()> {
    // 2 rows, 3 cols:
    //   ▲       ← tip
    //  /█\      ← fuselage + wings
    let (_, bottom) = screen.play_rows();
    let tip_row = screen
        .row(view.player_y, view.field_height)
        .unwrap_or(bottom)
        .min(bottom.saturating_sub(1));
    let x = screen.column(view.player_x);
    out.queue(style::SetForegroundColor(C_PLAYER))?;

    out.queue(cursor::MoveTo(x, tip_row))?;
    out.queue(Print("▲"))?;
    out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), tip_row + 1))?;
    out.queue(Print("/█\\"))?;

    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    sprite: &SpriteView,
    view: &FrameView,
    screen: Screen,
) -> std::io::Result<()> {
    let Some(row) = screen.row(sprite.y, view.field_height) else {
        return Ok(());
    };
    let (_, bottom) = screen.play_rows();
    let lx = screen.column(sprite.x).saturating_sub(1).max(1);

    //   «▼»    ← swept-back wings
    //   ╚═╝    ← engine block
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(Print("«▼»"))?;
    if row < bottom {
        out.queue(cursor::MoveTo(lx, row + 1))?;
        out.queue(Print("╚═╝"))?;
    }
    Ok(())
}

fn draw_sprite<W: Write>(
    out: &mut W,
    sprite: &SpriteView,
    view: &FrameView,
    screen: Screen,
) -> std::io::Result<()> {
    let Some(row) = screen.row(sprite.y, view.field_height) else {
        return Ok(());
    };
    let (glyph, color) = match sprite.kind {
        SpriteKind::Bullet => ("║", C_BULLET),
        SpriteKind::Particle => ("·", C_PARTICLE),
        SpriteKind::Explosion => ("✺", C_EXPLOSION),
        SpriteKind::Enemy => ("▼", C_ENEMY),
    };
    out.queue(cursor::MoveTo(screen.column(sprite.x), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, screen: Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D / drag : Move   SPACE / click : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    screen: Screen,
    start_row: u16,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = screen.width / 2;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_start_screen<W: Write>(out: &mut W, screen: Screen) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════════╗".to_string(), Color::Cyan),
        ("║  ★ COSMIC  DEFENDER ★  ║".to_string(), Color::Cyan),
        ("╚════════════════════════╝".to_string(), Color::Cyan),
        ("Stop the invaders before they reach Earth".to_string(), Color::White),
        (String::new(), Color::White),
        ("← → / A D : Move    SPACE : Shoot".to_string(), Color::DarkGrey),
        ("ENTER - Start   Q - Quit".to_string(), Color::Yellow),
    ];
    let start_row = (screen.height / 2).saturating_sub(lines.len() as u16 / 2);
    draw_centered(out, screen, start_row, &lines)
}

fn draw_game_over<W: Write>(out: &mut W, view: &FrameView, screen: Screen) -> std::io::Result<()> {
    let message = view.final_message().unwrap_or_default();
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {}", view.score), Color::Yellow),
        (message.to_string(), Color::White),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    let start_row = (screen.height / 2).saturating_sub(lines.len() as u16 / 2);
    draw_centered(out, screen, start_row, &lines)
}
