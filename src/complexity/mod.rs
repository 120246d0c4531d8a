pub mod cyclomatic;

pub use cyclomatic::{
    calculate_cyclomatic, calculate_function_complexities, total_complexity, FunctionComplexity,
};
