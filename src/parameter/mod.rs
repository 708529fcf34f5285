//! Parameters, the tagged value they carry, and the lookup engine.
pub mod list;
#[allow(clippy::module_inception)]
pub mod parameter;
pub mod parameterized;
pub mod predicate;
pub mod value;

pub use list::ParameterList;
pub use parameter::Parameter;
pub use parameterized::Parameterized;
pub use predicate::{
    and, parameter_name, parameter_name_and_type, parameter_name_variable, parameter_name_variable_type, parameter_type,
    parameter_variable, parameter_variable_and_type,
};
pub use value::{ParameterType, Value};
