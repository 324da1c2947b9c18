//! gradkit prelude.
//!
//! This module contains the most used types, traits and functions that you
//! can import easily as a group.
//!
//! ```
//! use gradkit::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use crate::error::{InversionError, MinimizerError};

#[doc(no_inline)]
pub use crate::minimize::{
    find_step_size, Bfgs, BracketStrategy, CurvaturePolicy, LineSearchOptions, Minimizer,
    MultiDimFn, MultiDimGradFn, MultiDimHessFn, MultiDimNumGradFn, Newton, ObjFn, ObjGradFn,
    ObjHessFn, OptimizeResult, Options, SearchDirection,
};

#[doc(no_inline)]
pub use crate::problems::{QuadraticForm, QuarticSum, Rosenbrock};
