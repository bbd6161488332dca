// Domain layer: API models, form validation and list filtering. No I/O.

pub mod cpf;
pub mod filter;
pub mod forms;
pub mod mask;
pub mod model;
pub mod ports;
