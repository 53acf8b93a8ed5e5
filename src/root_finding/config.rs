//! Shared configuration for root-finding algorithms.
//!
//! Provides [`CommonCfg`] with default tolerances and iteration limits,
//! used by all root-finding configs.
//!
//! [`CommonCfg`] universal fields
//! ├ `residual`          : step (abscissa) tolerance
//! ├ `function_residual` : function-value tolerance
//! ├ `max_iter`          : iteration cap (optional)
//! ├ `error_mode`        : step normalization (optional)
//! └ `cancel`            : cooperative cancellation token (optional)
//!
//! [`CommonCfg::new`] initializes configuration with default values.
//! Setters are generated per config through `impl_common_cfg!` and
//! validate their input eagerly.

use super::cancel::CancellationToken;
use super::controller::ErrorMode;


pub const DEFAULT_RESIDUAL          : f64 = 1e-6;
pub const DEFAULT_FUNCTION_RESIDUAL : f64 = 1e-6;


#[derive(Debug, Clone)]
pub struct CommonCfg {
    residual:          f64,
    function_residual: f64,
    max_iter:          Option<usize>,
    error_mode:        Option<ErrorMode>,
    cancel:            Option<CancellationToken>,
}

impl CommonCfg {
    pub fn new() -> Self {
        Self {
            residual          : DEFAULT_RESIDUAL,
            function_residual : DEFAULT_FUNCTION_RESIDUAL,
            max_iter          : None,
            error_mode        : None,
            cancel            : None,
        }
    }

    // getters
    pub fn residual(&self)          -> f64 { self.residual }
    pub fn function_residual(&self) -> f64 { self.function_residual }
    pub fn max_iter(&self)          -> Option<usize> { self.max_iter }
    pub fn error_mode(&self)        -> Option<ErrorMode> { self.error_mode }
    pub fn cancel(&self)            -> Option<&CancellationToken> { self.cancel.as_ref() }

    // setters (internal)
    pub(crate) fn with_residual          (&mut self, v: f64)       { self.residual          = v; }
    pub(crate) fn with_function_residual (&mut self, v: f64)       { self.function_residual = v; }
    pub(crate) fn with_max_iter          (&mut self, v: usize)     { self.max_iter          = Some(v); }
    pub(crate) fn with_error_mode        (&mut self, v: ErrorMode) { self.error_mode        = Some(v); }
    pub(crate) fn with_cancel (&mut self, v: CancellationToken) { self.cancel = Some(v); }
}

impl Default for CommonCfg {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_common_cfg {
    ($cfg:ty) => {
        impl $cfg {
            pub fn set_residual(
                mut self, v: f64
            ) -> Result<Self, $crate::root_finding::errors::ToleranceError> {
                if !v.is_finite() || v <= 0.0 {
                    return Err(
                        $crate::root_finding::errors::ToleranceError::InvalidResidual { got: v }
                    );
                }
                self.common.with_residual(v);
                Ok(self)
            }
            pub fn set_function_residual(
                mut self, v: f64
            ) -> Result<Self, $crate::root_finding::errors::ToleranceError> {
                if !v.is_finite() || v <= 0.0 {
                    return Err(
                        $crate::root_finding::errors::ToleranceError::InvalidFunctionResidual { got: v }
                    );
                }
                self.common.with_function_residual(v);
                Ok(self)
            }
            pub fn set_max_iter(
                mut self, v: usize
            ) -> Result<Self, $crate::root_finding::errors::RootFindingError> {
                if v == 0 {
                    return Err(
                        $crate::root_finding::errors::RootFindingError::InvalidMaxIter { got: v }
                    );
                }
                self.common.with_max_iter(v);
                Ok(self)
            }
            #[must_use]
            pub fn set_error_mode(
                mut self, v: $crate::root_finding::controller::ErrorMode
            ) -> Self {
                self.common.with_error_mode(v);
                self
            }
            #[must_use]
            pub fn with_cancellation(
                mut self, token: $crate::root_finding::cancel::CancellationToken
            ) -> Self {
                self.common.with_cancel(token);
                self
            }
            #[must_use]
            pub fn common(&self) -> &$crate::root_finding::config::CommonCfg {
                &self.common
            }
        }
    };
}
pub(crate) use impl_common_cfg;
