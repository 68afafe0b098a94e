//! Survival round: таймер, счёт, win/lose.
//!
//! - Outcome фиксируется ОДИН раз (повторный lose/win игнорируется)
//! - Счёт растёт только пока раунд идёт
//! - `restart` возвращает всё в начальное состояние

use crate::config::RoundConfig;

/// Что horde сообщает раунду
pub trait RoundEvents {
    /// Зомби дотянулся до игрока
    fn lose_round(&mut self);
    /// Зомби убит игроком
    fn add_kill_score(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundOutcome {
    #[default]
    InProgress,
    /// Таймер дошёл до нуля
    Survived,
    Died,
}

#[derive(Debug, Clone)]
pub struct SurvivalRound {
    config: RoundConfig,
    time_left: f32,
    score: u32,
    outcome: RoundOutcome,
}

impl SurvivalRound {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            time_left: config.round_time,
            config,
            score: 0,
            outcome: RoundOutcome::InProgress,
        }
    }

    pub fn restart(&mut self) {
        self.time_left = self.config.round_time;
        self.score = 0;
        self.outcome = RoundOutcome::InProgress;
        crate::log_info(&format!("Round restarted ({:.0}s)", self.config.round_time));
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome != RoundOutcome::InProgress
    }

    /// Countdown. Возвращает outcome после тика.
    pub fn tick(&mut self, delta: f32) -> RoundOutcome {
        if self.is_game_over() {
            return self.outcome;
        }

        self.time_left -= delta;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.finish(RoundOutcome::Survived);
        }
        self.outcome
    }

    pub fn add_score(&mut self, amount: u32) {
        if self.is_game_over() {
            return;
        }
        self.score = self.score.saturating_add(amount);
    }

    /// Текст для HUD ("" пока раунд идёт)
    pub fn status_text(&self) -> &'static str {
        match self.outcome {
            RoundOutcome::InProgress => "",
            RoundOutcome::Survived => "SURVIVED!",
            RoundOutcome::Died => "YOU DIED!",
        }
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        if self.is_game_over() {
            return;
        }
        self.outcome = outcome;
        crate::log_info(&format!(
            "🏁 Round over: {} (score {}, time left {})",
            self.status_text(),
            self.score,
            format_time(self.time_left)
        ));
    }
}

impl RoundEvents for SurvivalRound {
    fn lose_round(&mut self) {
        self.finish(RoundOutcome::Died);
    }

    fn add_kill_score(&mut self) {
        self.add_score(self.config.points_per_kill);
    }
}

/// MM:SS, секунды округляются вверх (0.2s → "00:01")
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).ceil() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
