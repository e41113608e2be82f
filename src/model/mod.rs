pub mod achievement;
pub mod event_result;
pub mod game_state;
pub mod llm_decode;
pub mod message;
pub mod phase;
pub mod reply;
