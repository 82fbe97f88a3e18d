pub mod impl_state_machine;
