use crate::vars::{GIGA, KILO};

pub trait Unit<T> {
    fn confine(value: T) -> Self;
    fn release(self) -> T;
}

macro_rules! impl_unit {
    ($unit:ident) => {
        #[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
        pub struct $unit(f64);

        impl Unit<f64> for $unit {
            fn confine(value: f64) -> Self {
                Self(value)
            }

            fn release(self) -> f64 {
                self.0
            }
        }
    };
}

impl_unit!(Meters);
impl_unit!(Hertz);
impl_unit!(Decibels);

impl Meters {
    pub fn kilometers(self) -> f64 {
        self.0 / KILO
    }
}

impl Hertz {
    pub fn gigahertz(self) -> f64 {
        self.0 / GIGA
    }
}
