//! Gradient-based unconstrained minimization on `ndarray` vectors.
//!
//! Provides Newton's method and the BFGS quasi-Newton method, both driven by
//! a shared bracketing line search with quadratic refinement.
//!
//! ```
//! use gradkit::prelude::*;
//! use ndarray::array;
//!
//! let newton = Newton::new(Rosenbrock::default());
//! let result = newton.minimize(&array![0.1, 0.1], &Options::default()).unwrap();
//!
//! assert!((result.x_min[0] - 1.0).abs() < 1e-3);
//! ```

pub mod error;
pub mod linalg;
pub mod minimize;
pub mod prelude;
pub mod problems;
