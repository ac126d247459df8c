pub mod local_state_repository;
