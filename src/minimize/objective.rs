use dyn_clone::DynClone;
use ndarray::prelude::*;

// Define a trait for the objective function
pub trait ObjFn: DynClone {
    fn evaluate(&self, x: &Array1<f64>) -> f64;
}
dyn_clone::clone_trait_object!(ObjFn);

// Define a trait for the gradient function
pub trait ObjGradFn: ObjFn + DynClone {
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64>;
}
dyn_clone::clone_trait_object!(ObjGradFn);

// Define a trait for the hessian function
pub trait ObjHessFn: ObjGradFn + DynClone {
    fn hessian(&self, x: &Array1<f64>) -> Array2<f64>;
}
dyn_clone::clone_trait_object!(ObjHessFn);

// Wrapper for multi-dimensional functions
#[derive(Clone)]
pub struct MultiDimFn<F>(pub F)
where
    F: Fn(&Array1<f64>) -> f64 + Clone;

impl<F> MultiDimFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    pub fn new(f: F) -> Self {
        MultiDimFn(f)
    }
}

impl<F> ObjFn for MultiDimFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (self.0)(x)
    }
}

// Wrapper for multi-dimensional function w/gradient
#[derive(Clone)]
pub struct MultiDimGradFn<F, GF>(pub F, pub GF)
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone;

impl<F, GF> MultiDimGradFn<F, GF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
{
    pub fn new(f: F, gf: GF) -> Self {
        MultiDimGradFn(f, gf)
    }
}

impl<F, GF> ObjFn for MultiDimGradFn<F, GF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
{
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (self.0)(x)
    }
}

impl<F, GF> ObjGradFn for MultiDimGradFn<F, GF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
{
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        (self.1)(x)
    }
}

// Wrapper for multi-dimensional function w/numerical gradient
#[derive(Clone)]
pub struct MultiDimNumGradFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    f: F,
    step: f64,
}

impl<F> MultiDimNumGradFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    pub fn new(f: F, step: Option<f64>) -> Self {
        Self {
            f,
            step: step.unwrap_or(1e-6),
        }
    }

    /// Central-difference gradient
    pub fn numerical_gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        let mut probe = x.clone();
        Array1::from_shape_fn(x.len(), |i| {
            let xi = probe[i];
            probe[i] = xi + self.step;
            let f_plus_h = (self.f)(&probe);
            probe[i] = xi - self.step;
            let f_minus_h = (self.f)(&probe);
            probe[i] = xi;
            (f_plus_h - f_minus_h) / (2.0 * self.step)
        })
    }
}

impl<F> ObjFn for MultiDimNumGradFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (self.f)(x)
    }
}

impl<F> ObjGradFn for MultiDimNumGradFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
{
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        self.numerical_gradient(x)
    }
}

// Wrapper for multi-dimensional function w/hessian
#[derive(Clone)]
pub struct MultiDimHessFn<F, GF, HF>(pub F, pub GF, pub HF)
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
    HF: Fn(&Array1<f64>) -> Array2<f64> + Clone;

impl<F, GF, HF> MultiDimHessFn<F, GF, HF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
    HF: Fn(&Array1<f64>) -> Array2<f64> + Clone,
{
    pub fn new(f: F, gf: GF, hf: HF) -> Self {
        MultiDimHessFn(f, gf, hf)
    }
}

impl<F, GF, HF> ObjFn for MultiDimHessFn<F, GF, HF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
    HF: Fn(&Array1<f64>) -> Array2<f64> + Clone,
{
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (self.0)(x)
    }
}

impl<F, GF, HF> ObjGradFn for MultiDimHessFn<F, GF, HF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
    HF: Fn(&Array1<f64>) -> Array2<f64> + Clone,
{
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        (self.1)(x)
    }
}

impl<F, GF, HF> ObjHessFn for MultiDimHessFn<F, GF, HF>
where
    F: Fn(&Array1<f64>) -> f64 + Clone,
    GF: Fn(&Array1<f64>) -> Array1<f64> + Clone,
    HF: Fn(&Array1<f64>) -> Array2<f64> + Clone,
{
    fn hessian(&self, x: &Array1<f64>) -> Array2<f64> {
        (self.2)(x)
    }
}
