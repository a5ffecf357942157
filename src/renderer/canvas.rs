//! Canvas2D drawing of the playfield

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::PIPE_WIDTH;
use crate::sim::{Bird, GameState, Particle, Pickup, Pipe};

// Palette
const SKY_TOP: &str = "#1F002A";
const SKY_MID: &str = "#290932";
const SKY_BOTTOM: &str = "#381763";
const CLOUD: &str = "rgba(118, 82, 154, 0.3)";
const PIPE_BODY: &str = "#76529A";
const PIPE_CAP: &str = "#381763";
const BIRD_BODY: &str = "#3EA45D";
const BIRD_BEAK: &str = "#FF6347";
const BIRD_EYE: &str = "#000";
const COIN: &str = "#FFD700";
const COUPON: &str = "#FF69B4";

const CAP_HEIGHT: f64 = 20.0;
const CAP_OVERHANG: f64 = 5.0;
const PARTICLE_SIZE: f64 = 4.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
        }
    }

    /// Draw one frame. Entities are drawn only once a run has started.
    pub fn render(&self, state: &GameState, show_entities: bool) -> Result<(), JsValue> {
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.draw_background(w, h)?;

        if !show_entities {
            return Ok(());
        }
        for pipe in &state.entities.pipes {
            self.draw_pipe(pipe, h);
        }
        for coin in &state.entities.coins {
            self.draw_coin(coin);
        }
        let pulse = (state.time_ticks as f64 * 0.1).sin() * 3.0;
        for coupon in &state.entities.coupons {
            self.draw_coupon(coupon, pulse);
        }
        for particle in &state.entities.particles {
            self.draw_particle(particle);
        }
        self.draw_bird(&state.bird);
        Ok(())
    }

    fn draw_background(&self, w: f64, h: f64) -> Result<(), JsValue> {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        gradient.add_color_stop(0.0, SKY_TOP)?;
        gradient.add_color_stop(0.5, SKY_MID)?;
        gradient.add_color_stop(1.0, SKY_BOTTOM)?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.ctx.set_fill_style_str(CLOUD);
        for &(x, y, r) in &[(100.0, 80.0, 25.0), (300.0, 120.0, 20.0)] {
            self.ctx.begin_path();
            self.ctx.arc(x, y, r, 0.0, TAU)?;
            self.ctx.arc(x + 20.0, y, r + 5.0, 0.0, TAU)?;
            self.ctx.arc(x + 40.0, y, r, 0.0, TAU)?;
            self.ctx.fill();
        }
        Ok(())
    }

    fn draw_pipe(&self, pipe: &Pipe, h: f64) {
        let x = pipe.x as f64;
        let width = PIPE_WIDTH as f64;
        let top = pipe.gap_top as f64;
        let bottom = pipe.gap_bottom() as f64;

        self.ctx.set_fill_style_str(PIPE_BODY);
        self.ctx.fill_rect(x, 0.0, width, top);
        self.ctx.fill_rect(x, bottom, width, (h - bottom).max(0.0));

        self.ctx.set_fill_style_str(PIPE_CAP);
        let cap_width = width + 2.0 * CAP_OVERHANG;
        self.ctx
            .fill_rect(x - CAP_OVERHANG, top - CAP_HEIGHT, cap_width, CAP_HEIGHT);
        self.ctx
            .fill_rect(x - CAP_OVERHANG, bottom, cap_width, CAP_HEIGHT);
    }

    fn draw_coin(&self, coin: &Pickup) {
        self.ctx.set_fill_style_str(COIN);
        self.ctx.fill_rect(
            coin.pos.x as f64,
            coin.pos.y as f64,
            coin.size.x as f64,
            coin.size.y as f64,
        );
    }

    fn draw_coupon(&self, coupon: &Pickup, pulse: f64) {
        self.ctx.save();
        self.ctx.set_shadow_color(COUPON);
        self.ctx.set_shadow_blur(10.0 + pulse);
        self.ctx.set_fill_style_str(COUPON);
        self.ctx.fill_rect(
            coupon.pos.x as f64 - pulse / 2.0,
            coupon.pos.y as f64 - pulse / 2.0,
            coupon.size.x as f64 + pulse,
            coupon.size.y as f64 + pulse,
        );
        self.ctx.restore();
    }

    fn draw_particle(&self, particle: &Particle) {
        self.ctx.set_global_alpha(particle.alpha() as f64);
        self.ctx.set_fill_style_str(particle.color.css());
        self.ctx.fill_rect(
            particle.pos.x as f64 - PARTICLE_SIZE / 2.0,
            particle.pos.y as f64 - PARTICLE_SIZE / 2.0,
            PARTICLE_SIZE,
            PARTICLE_SIZE,
        );
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_bird(&self, bird: &Bird) {
        let (x, y) = (bird.pos.x as f64, bird.pos.y as f64);
        let (w, h) = (bird.size.x as f64, bird.size.y as f64);

        self.ctx.set_fill_style_str(BIRD_BODY);
        self.ctx.fill_rect(x, y, w, h);
        self.ctx.set_fill_style_str(BIRD_BEAK);
        self.ctx.fill_rect(x + w - 5.0, y + h / 2.0 - 2.0, 8.0, 4.0);
        self.ctx.set_fill_style_str(BIRD_EYE);
        self.ctx.fill_rect(x + 5.0, y + 5.0, 3.0, 3.0);
    }
}
