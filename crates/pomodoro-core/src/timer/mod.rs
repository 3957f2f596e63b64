mod clock;
mod controller;
mod messages;
mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::SessionController;
pub use messages::{
    select_break_message, RandomSource, SeededRandom, ThreadRandom, BREAK_MESSAGES, EASTER_EGG,
    EASTER_EGG_ODDS,
};
pub use session::{format_time, Phase, Session, SessionState};
