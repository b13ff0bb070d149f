pub mod choice;
pub mod spinner;
pub mod text_input;

pub use choice::{Choice, ChoiceWidget};
pub use spinner::{Spinner, SpinnerWidget};
pub use text_input::{TextInput, TextInputWidget};
