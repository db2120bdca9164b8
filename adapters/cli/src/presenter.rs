//! Line-oriented presenter that prints the HUD to a writer.

use std::io::{self, Write};

use quiz_defence_core::{EconomySnapshot, WaveStatus};
use quiz_defence_presentation::{status_banner, FrameSnapshot, Presenter};

/// Prints HUD changes as they happen and an entity summary every
/// `summary_interval` frames.
#[derive(Debug)]
pub(crate) struct TextPresenter<W> {
    out: W,
    summary_interval: u64,
    frames: u64,
    error: Option<io::Error>,
}

impl<W: Write> TextPresenter<W> {
    pub(crate) fn new(out: W, summary_interval: u64) -> Self {
        Self {
            out,
            summary_interval,
            frames: 0,
            error: None,
        }
    }

    /// Surfaces the first write failure, if any, and flushes the writer.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.out.write_fmt(args).and_then(|()| self.out.write_all(b"\n")) {
            self.error = Some(error);
        }
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn on_entities_changed(&mut self, frame: &FrameSnapshot) {
        self.frames += 1;
        if self.summary_interval == 0 || self.frames % self.summary_interval != 0 {
            return;
        }
        let frame_index = self.frames;
        self.line(format_args!(
            "frame {frame_index}: {} enemies, {} towers, {} projectiles",
            frame.enemies.len(),
            frame.towers.len(),
            frame.projectiles.len()
        ));
    }

    fn on_economy_changed(&mut self, economy: EconomySnapshot) {
        self.line(format_args!(
            "wave {} | gold {} | lives {} | xp {}",
            economy.wave.get(),
            economy.gold,
            economy.lives,
            economy.experience
        ));
    }

    fn on_wave_status(&mut self, status: WaveStatus) {
        self.line(format_args!("== {} ==", status_banner(status)));
    }

    fn on_quiz_requested(&mut self, prompt: &str) {
        self.line(format_args!("quiz: {prompt}"));
    }

    fn on_quiz_resolved(&mut self, correct: bool) {
        let verdict = if correct { "correct" } else { "wrong" };
        self.line(format_args!("quiz answer {verdict}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_defence_core::WaveNumber;

    fn printed(presenter: TextPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.out).expect("utf8 output")
    }

    #[test]
    fn hud_lines_are_printed() {
        let mut presenter = TextPresenter::new(Vec::new(), 0);
        presenter.on_wave_status(WaveStatus::Spawning);
        presenter.on_economy_changed(EconomySnapshot {
            gold: 100,
            lives: 19,
            experience: 15,
            wave: WaveNumber::FIRST,
        });
        presenter.on_quiz_requested("3 x 4 = ?");
        presenter.on_quiz_resolved(false);
        presenter.on_entities_changed(&FrameSnapshot::default());
        presenter.finish().expect("in-memory writer");

        assert_eq!(
            printed(presenter),
            "== Enemies incoming ==\n\
             wave 1 | gold 100 | lives 19 | xp 15\n\
             quiz: 3 x 4 = ?\n\
             quiz answer wrong\n"
        );
    }

    #[test]
    fn entity_summary_follows_interval() {
        let mut presenter = TextPresenter::new(Vec::new(), 2);
        for _ in 0..5 {
            presenter.on_entities_changed(&FrameSnapshot::default());
        }
        assert_eq!(
            printed(presenter),
            "frame 2: 0 enemies, 0 towers, 0 projectiles\n\
             frame 4: 0 enemies, 0 towers, 0 projectiles\n"
        );
    }
}
