//! Zombie FSM: состояния, стимулы и таблица переходов.
//!
//! Таблица (`transition`) это чистая функция, без доступа к навигации,
//! таймерам или шине. Guard'ы, которые зависят от мира ("игрок не виден",
//! "дошли до точки"), проверяет brain ПЕРЕД тем как поднять стимул.

/// Ровно одно активное состояние в каждый момент
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZombieState {
    /// Бродим вокруг spawn point
    #[default]
    Wander,

    /// Идём к последнему услышанному звуку
    InvestigateSound,

    /// Видим игрока: бежим за ним
    Chase,

    /// Потеряли игрока: обыскиваем окрестности last known position
    Search,
}

impl ZombieState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZombieState::Wander => "Wander",
            ZombieState::InvestigateSound => "InvestigateSound",
            ZombieState::Chase => "Chase",
            ZombieState::Search => "Search",
        }
    }
}

/// Что произошло (world guard уже проверен)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stimulus {
    /// Звук прошёл distance test
    SoundHeard,
    /// Vision test прошёл в этом тике
    PlayerSpotted,
    /// В Chase, но игрок не виден в этом тике
    PlayerLost,
    /// Wander: дошли до точки или истёк repath таймер
    WanderPointDone,
    /// InvestigateSound: дошли до звука, игрок не виден
    SoundReached,
    /// Search: дошли до search point, время ещё есть
    SearchPointReached,
    /// Search: search таймер <= 0
    SearchExpired,
    /// Wander/Search: есть неотработанный звук, игрок не виден
    SoundPending,
}

/// Решение таблицы переходов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Войти в состояние (с его entry actions; self-transition тоже перезапускает entry)
    Enter(ZombieState),
    /// Остаться и выбрать новую точку (wander/search) без entry actions
    Repick,
    /// Стимул в этом состоянии ничего не меняет
    Stay,
}

pub fn transition(state: ZombieState, stimulus: Stimulus) -> Transition {
    use Stimulus::*;
    use ZombieState::*;

    match (state, stimulus) {
        // Chase глухой: игрок важнее любого звука
        (Chase, SoundHeard) => Transition::Stay,
        (_, SoundHeard) => Transition::Enter(InvestigateSound),

        (Chase, PlayerSpotted) => Transition::Stay,
        (_, PlayerSpotted) => Transition::Enter(Chase),

        (Chase, PlayerLost) => Transition::Enter(Search),

        (Wander, WanderPointDone) => Transition::Repick,

        (InvestigateSound, SoundReached) => Transition::Enter(Search),

        (Search, SearchPointReached) => Transition::Repick,
        (Search, SearchExpired) => Transition::Enter(Wander),

        (Wander | Search, SoundPending) => Transition::Enter(InvestigateSound),

        _ => Transition::Stay,
    }
}
