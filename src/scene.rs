//! Paints a [`Game`] onto a [`PixelBuf`].

use crate::canvas::{PixelBuf, Rgb};
use crate::game::{Game, State};

// ── Colors ──────────────────────────────────────────────────────────────────

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
pub const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
pub const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[ch as usize - 'A' as usize]),
        'a'..='z' => Some(&LETTERS[ch as usize - 'a' as usize]),
        _ => None,
    }
}

/// Width in pixels of `text` drawn with `px`-sized dots.
pub fn text_width(text: &str, px: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 4 - 1) * px }
}

/// Draws `text` centred on `cx`, with a drop shadow. Unknown characters
/// leave a blank cell.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb, px: i32) {
    let px = px.max(1);
    let start_x = cx - text_width(text, px) / 2;
    for pass in [true, false] {
        for (i, ch) in text.chars().enumerate() {
            let Some(g) = glyph(ch) else { continue };
            let gx = start_x + i as i32 * 4 * px;
            for row in 0..5 {
                for col in 0..3 {
                    if g[row * 3 + col] == 1 {
                        let x = gx + col as i32 * px;
                        let y = y + row as i32 * px;
                        if pass {
                            buf.fill_rect(x + px, y + px, px, px, SHADOW);
                        } else {
                            buf.fill_rect(x, y, px, px, fg);
                        }
                    }
                }
            }
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), fg, 1);
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Decoration size unit: 1.0 on a 48-pixel-tall viewport.
fn ui_scale(game: &Game) -> f64 {
    game.size().1 as f64 / 48.0
}

pub fn draw(game: &Game, buf: &mut PixelBuf) {
    draw_sky(game, buf);
    draw_hills(game, buf);
    draw_pipes(game, buf);
    draw_ground(game, buf);
    draw_bird(game, buf);

    match game.state() {
        State::Ready => draw_title(game, buf),
        State::Playing | State::Dying => {
            draw_number(buf, game.size().0 as i32 / 2, 4, game.score(), WHITE);
        }
        State::Dead => {
            if game.can_restart() {
                draw_game_over(game, buf);
            } else {
                draw_number(buf, game.size().0 as i32 / 2, 4, game.score(), WHITE);
            }
        }
    }

    if game.show_hud() {
        draw_tuning_hud(game, buf);
    }
}

fn draw_sky(game: &Game, buf: &mut PixelBuf) {
    let (pw, _) = game.size();
    let sky_h = game.layout().sky_h as usize;
    for y in 0..sky_h {
        let t = (y * 256 / sky_h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..pw {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_hills(game: &Game, buf: &mut PixelBuf) {
    let s = ui_scale(game);
    let pw = game.size().0 as i32;
    let base = game.layout().sky_h as i32;
    let scroll = game.ground_x();

    // Far hills
    for x in 0..pw {
        let fx = (x as f64 + scroll * 0.2) * 0.04;
        let h = (fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0) * s;
        let top = base - h as i32 - (4.0 * s) as i32;
        for y in top..base {
            buf.set(x, y, HILL_FAR);
        }
    }
    // Near hills
    for x in 0..pw {
        let fx = (x as f64 + scroll * 0.4) * 0.06;
        let h = (fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0) * s;
        let top = base - h as i32 - (2.0 * s) as i32;
        for y in top..base {
            buf.set(x, y, HILL_NEAR);
        }
    }
}

fn draw_ground(game: &Game, buf: &mut PixelBuf) {
    let (pw, ph) = game.size();
    let gy = game.layout().sky_h as i32;
    let scroll = game.ground_x();

    for x in 0..pw as i32 {
        let alt = ((x as f64 + scroll) as i32 / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    for y in (gy + 2)..ph as i32 {
        for x in 0..pw as i32 {
            let stripe = ((x as f64 + scroll * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_pipes(game: &Game, buf: &mut PixelBuf) {
    let l = game.layout();
    let cap_extra = game.cap_extra();
    let cap_h = (3.0 * ui_scale(game)).max(2.0) as i32;
    let pw = l.pipe_w as i32;
    let sky_h = l.sky_h as i32;

    for pipe in game.pipes() {
        let px = pipe.x as i32;
        let gap_top = pipe.gap_top as i32;
        let gap_bot = (pipe.gap_top + l.gap) as i32;

        // Top pipe body
        for x in 0..pw {
            let c = pipe_shade(x, pw);
            for y in 0..gap_top - cap_h {
                buf.set(px + x, y, c);
            }
        }
        // Top pipe cap
        for x in -cap_extra..(pw + cap_extra) {
            let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
            for y in (gap_top - cap_h).max(0)..gap_top {
                buf.set(px + x, y, c);
            }
            if gap_top - cap_h >= 0 {
                buf.set(px + x, gap_top - cap_h, CAP_DARK);
            }
            buf.set(px + x, gap_top - 1, CAP_DARK);
        }

        // Bottom pipe cap
        for x in -cap_extra..(pw + cap_extra) {
            let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
            for y in gap_bot..(gap_bot + cap_h).min(sky_h) {
                buf.set(px + x, y, c);
            }
            buf.set(px + x, gap_bot, CAP_DARK);
            if gap_bot + cap_h - 1 < sky_h {
                buf.set(px + x, gap_bot + cap_h - 1, CAP_DARK);
            }
        }
        // Bottom pipe body
        for x in 0..pw {
            let c = pipe_shade(x, pw);
            for y in (gap_bot + cap_h)..sky_h {
                buf.set(px + x, y, c);
            }
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

fn draw_bird(game: &Game, buf: &mut PixelBuf) {
    let l = game.layout();
    let cx = l.bird_x as i32;
    let cy = game.bird_y() as i32;

    // Nose down when falling, up when climbing.
    let tilt = (game.bird_vy() / l.lift.abs().max(f64::EPSILON)).clamp(-1.0, 1.0) as i32;

    // The body is the hitbox.
    let bw = (l.half_w.round() as i32).max(2);
    let bh = (l.half_h.round() as i32).max(1);
    buf.fill_rect(cx - bw, cy - bh, bw * 2, bh * 2, BIRD_Y);
    buf.fill_rect(cx - bw + 1, cy - bh, bw * 2 - 2, 1, BIRD_HI);

    // Wing
    let wing_y_off = if game.frame() % 8 < 4 { -1 } else { 0 };
    buf.fill_rect(cx - bw + 1, cy + wing_y_off + tilt, bw, bh.max(1), BIRD_WING);

    // Eye
    let ex = cx + bw - 2;
    let ey = cy - bh + (bh / 2);
    buf.fill_rect(ex, ey, 2, 1, BIRD_EYE);
    buf.set(ex + 1, ey, BIRD_PUPIL);

    // Beak
    let beak_w = (bw / 2).max(1);
    let beak_y = cy + tilt;
    buf.fill_rect(cx + bw, beak_y, beak_w, 1, BIRD_BEAK_HI);
    if bh > 1 {
        buf.fill_rect(cx + bw, beak_y + 1, beak_w, 1, BIRD_BEAK);
    }

    // Tail
    buf.fill_rect(cx - bw - 1, cy - 1 + tilt, 1, 2, BIRD_WING);
}

fn draw_title(game: &Game, buf: &mut PixelBuf) {
    let (pw, ph) = game.size();
    let cx = pw as i32 / 2;
    let cy = ph as i32 / 6;
    let px = (ui_scale(game) as i32).max(1);

    let mut title_px = px;
    while title_px > 1 && text_width("FLAPPY", title_px) > pw as i32 - 4 {
        title_px -= 1;
    }
    draw_text(buf, cx, cy, "FLAPPY", BIRD_Y, title_px);

    let prompt = if text_width("CLICK TO FLAP", 1) <= pw as i32 { "CLICK TO FLAP" } else { "FLAP" };
    draw_text(buf, cx, cy + 5 * title_px + 4, prompt, WHITE, 1);
}

fn draw_game_over(game: &Game, buf: &mut PixelBuf) {
    let (pw, ph) = game.size();
    let s = ui_scale(game);
    let cx = pw as i32 / 2;
    let cy = ph as i32 / 2;
    let panel_w = ((40.0 * s).max(30.0) as i32).min(pw as i32);
    let panel_h = (16.0 * s).max(32.0) as i32;

    buf.darken();

    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, DIRT);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

    draw_text(buf, cx, py + 2, "GAME OVER", WHITE, 1);
    draw_number(buf, cx, py + 9, game.score(), WHITE);
    draw_text(buf, cx, py + 17, "BEST", BIRD_Y, 1);
    draw_number(buf, cx, py + 24, game.best(), BIRD_Y);

    draw_text(buf, cx, py + panel_h + 3, "TAP TO RETRY", WHITE, 1);
}

fn draw_tuning_hud(game: &Game, buf: &mut PixelBuf) {
    // G=gravity  L=lift  S=speed, each value x100
    let p = game.physics();
    let g_val = (p.gravity * 100.0).round() as u32;
    let l_val = (-p.lift * 100.0).round() as u32;
    let s_val = (p.obstacle_speed * 100.0).round() as u32;

    let (pw, _) = game.size();
    let y = game.layout().sky_h as i32 - 8;
    let x = pw as i32 - 14;

    for (i, (label, val, c)) in [
        ("G", g_val, Rgb(180, 180, 255)),
        ("L", l_val, Rgb(255, 180, 180)),
        ("S", s_val, Rgb(180, 255, 180)),
    ]
    .into_iter()
    .enumerate()
    {
        let row_y = y - i as i32 * 7;
        draw_text(buf, x - 12, row_y, label, c, 1);
        draw_number(buf, x, row_y, val, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn game() -> Game {
        let mut config = Config::default();
        config.rules.seed = Some(3);
        Game::new(120, 80, &config)
    }

    #[test]
    fn every_letter_and_digit_has_a_glyph() {
        for ch in ('A'..='Z').chain('0'..='9') {
            assert!(glyph(ch).is_some(), "{ch}");
        }
        assert!(glyph(' ').is_none());
    }

    #[test]
    fn text_width_counts_spacing() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("7", 1), 3);
        assert_eq!(text_width("42", 1), 7);
        assert_eq!(text_width("42", 2), 14);
    }

    #[test]
    fn draw_text_paints_glyph_pixels() {
        let mut buf = PixelBuf::new(10, 10, SKY_TOP);
        draw_text(&mut buf, 5, 0, "1", WHITE, 1);
        // "1" has its stem in the middle column
        assert_eq!(buf.get(5, 2), WHITE);
        // Its shadow falls one pixel down-right of the bottom bar
        assert_eq!(buf.get(7, 5), SHADOW);
    }

    #[test]
    fn ready_scene_draws_bird_over_sky() {
        let g = game();
        let (w, h) = g.size();
        let mut buf = PixelBuf::new(w, h, SKY_TOP);
        draw(&g, &mut buf);
        let l = g.layout();
        let x0 = (l.bird_x - l.half_w) as usize;
        let x1 = (l.bird_x + l.half_w) as usize;
        let y0 = (g.bird_y() - l.half_h) as usize;
        let y1 = (g.bird_y() + l.half_h) as usize;
        let body = (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == BIRD_Y)
            .count();
        assert!(body > 0);
    }

    #[test]
    fn ground_fills_bottom_rows() {
        let g = game();
        let (w, h) = g.size();
        let mut buf = PixelBuf::new(w, h, SKY_TOP);
        draw(&g, &mut buf);
        let c = buf.get(0, h - 1);
        assert!(c == DIRT || c == DIRT_DARK);
    }

    #[test]
    fn pipes_are_drawn_when_on_screen() {
        let mut g = game();
        g.flap();
        // First pipe starts at the right edge; let it scroll in.
        for _ in 0..40 {
            g.flap();
            g.update();
        }
        let (w, h) = g.size();
        let mut buf = PixelBuf::new(w, h, SKY_TOP);
        draw(&g, &mut buf);
        let pipe = &g.pipes()[0];
        let x = pipe.x as i32 + 1;
        assert!(x >= 0 && (x as usize) < w);
        let gap_bot = (pipe.gap_top + g.layout().gap) as usize;
        assert_eq!(buf.get(x as usize, gap_bot), CAP_DARK);
    }
}
