pub mod frequency;
pub mod helpers;
pub mod mono_deque;

pub use frequency::FrequencyMap;
pub use mono_deque::MonoDeque;
