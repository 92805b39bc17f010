//! Frame-driven animations

use std::rc::Rc;

use crate::error::{ParticleError, Result};
use crate::renderer::{Graphic, Renderer};

/// Check that a sheet and frame rate can actually be played
pub fn validate_layout(graphic: &Graphic, ticks_per_frame: u32) -> Result<()> {
    let reason = if graphic.frames == 0 {
        "no frames"
    } else if graphic.frame_width == 0 || graphic.frame_height == 0 {
        "zero frame size"
    } else if ticks_per_frame == 0 {
        "zero ticks per frame"
    } else {
        return Ok(());
    };
    Err(ParticleError::InvalidAnimation {
        graphic: graphic.name.clone(),
        reason: reason.to_string(),
    })
}

/// A time-driven sequence of frames
pub trait Animation {
    /// Draw the current frame centered on screen (x, y)
    fn draw(&self, renderer: &mut dyn Renderer, x: i32, y: i32);
    /// Advance by `ticks` milliseconds
    fn update(&mut self, ticks: u32);
    /// True once a one-shot sequence has played out; never for loops
    fn is_finished(&self) -> bool;
}

/// What happens after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Once,
    Loop,
}

/// Steps through the frames of a sprite sheet at a fixed rate
#[derive(Debug, Clone)]
pub struct GraphicAnimation {
    graphic: Rc<Graphic>,
    ticks_per_frame: u32,
    current_frame: usize,
    curr_ticks: u32,
    playback: Playback,
    finished: bool,
}

impl GraphicAnimation {
    pub fn new(graphic: Rc<Graphic>, ticks_per_frame: u32, playback: Playback) -> Result<Self> {
        validate_layout(&graphic, ticks_per_frame)?;

        Ok(Self {
            graphic,
            ticks_per_frame,
            current_frame: 0,
            curr_ticks: 0,
            playback,
            finished: false,
        })
    }

    pub fn frame(&self) -> usize {
        self.current_frame
    }

    pub fn frame_count(&self) -> usize {
        self.graphic.frames
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }
}

impl Animation for GraphicAnimation {
    fn draw(&self, renderer: &mut dyn Renderer, x: i32, y: i32) {
        if self.finished {
            return;
        }
        let w = self.graphic.frame_width as i32;
        let h = self.graphic.frame_height as i32;
        renderer.draw_frame(&self.graphic, self.current_frame, x - w / 2, y - h / 2);
    }

    fn update(&mut self, ticks: u32) {
        if self.finished {
            return;
        }
        self.curr_ticks = self.curr_ticks.saturating_add(ticks);
        while self.curr_ticks >= self.ticks_per_frame {
            self.curr_ticks -= self.ticks_per_frame;
            if self.current_frame + 1 < self.graphic.frames {
                self.current_frame += 1;
                continue;
            }
            match self.playback {
                Playback::Loop => self.current_frame = 0,
                Playback::Once => {
                    // Hold the last frame
                    self.finished = true;
                    self.curr_ticks = 0;
                    break;
                }
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::test_support::graphic;
    use crate::renderer::SpriteBatch;

    #[test]
    fn test_rejects_empty_graphic() {
        let err = GraphicAnimation::new(graphic("empty.png", 0), 10, Playback::Once).unwrap_err();
        assert!(matches!(err, ParticleError::InvalidAnimation { .. }));

        let err = GraphicAnimation::new(graphic("ok.png", 4), 0, Playback::Once).unwrap_err();
        assert!(matches!(err, ParticleError::InvalidAnimation { .. }));
    }

    #[test]
    fn test_carries_remainder() {
        let mut anim = GraphicAnimation::new(graphic("a.png", 10), 40, Playback::Once).unwrap();
        anim.update(30);
        assert_eq!(anim.frame(), 0);
        anim.update(30);
        assert_eq!(anim.frame(), 1);
        // 20 ticks carried over, 20 more reaches the next frame
        anim.update(20);
        assert_eq!(anim.frame(), 2);
    }

    #[test]
    fn test_large_step_skips_frames() {
        let mut anim = GraphicAnimation::new(graphic("a.png", 10), 10, Playback::Once).unwrap();
        anim.update(35);
        assert_eq!(anim.frame(), 3);
    }

    #[test]
    fn test_once_finishes_and_holds() {
        let mut anim = GraphicAnimation::new(graphic("a.png", 4), 10, Playback::Once).unwrap();
        anim.update(30);
        assert_eq!(anim.frame(), 3);
        assert!(!anim.is_finished());

        anim.update(10);
        assert!(anim.is_finished());
        assert_eq!(anim.frame(), 3);

        anim.update(1000);
        assert_eq!(anim.frame(), 3);
    }

    #[test]
    fn test_loop_never_finishes() {
        let mut anim = GraphicAnimation::new(graphic("a.png", 4), 10, Playback::Loop).unwrap();
        for _ in 0..100 {
            anim.update(7);
            assert!(anim.frame() < anim.frame_count());
            assert!(!anim.is_finished());
        }
        let mut anim = GraphicAnimation::new(graphic("a.png", 4), 10, Playback::Loop).unwrap();
        anim.update(40);
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn test_draw_centered() {
        let anim = GraphicAnimation::new(graphic("a.png", 4), 10, Playback::Once).unwrap();
        let mut batch = SpriteBatch::new();
        anim.draw(&mut batch, 100, 50);
        assert_eq!(batch.instances()[0].position, [92.0, 42.0]);
    }

    #[test]
    fn test_finished_draws_nothing() {
        let mut anim = GraphicAnimation::new(graphic("a.png", 2), 10, Playback::Once).unwrap();
        anim.update(20);
        let mut batch = SpriteBatch::new();
        anim.draw(&mut batch, 0, 0);
        assert!(batch.is_empty());
    }
}
