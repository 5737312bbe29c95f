//! Python bindings via PyO3

mod convert;

pub use convert::to_value;

use crate::condition::{cache, Condition};
use crate::config::{self, OperatorConfig};
use crate::search::{self, ErrorPolicy};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Python Classes
// ============================================================================

/// A compiled condition tree, safe to share between threads
#[pyclass(frozen, name = "ObjectFilter")]
pub struct PyObjectFilter {
    condition: Arc<Condition>,
}

#[pymethods]
impl PyObjectFilter {
    /// Evaluate the condition against one object
    fn matches(&self, obj: &Bound<'_, PyAny>) -> PyResult<bool> {
        let value = to_value(obj)?;
        Ok(self.condition.matches(&value)?)
    }

    /// Return the objects of an iterable that match, in order
    fn select<'py>(&self, objs: &Bound<'py, PyAny>) -> PyResult<Vec<Bound<'py, PyAny>>> {
        let mut selected = Vec::new();
        for item in objs.try_iter()? {
            let item = item?;
            if self.condition.matches(&to_value(&item)?)? {
                selected.push(item);
            }
        }
        Ok(selected)
    }

    /// Select asynchronously
    ///
    /// Objects are converted while holding the GIL, then evaluated on a
    /// blocking Tokio thread so the asyncio event loop stays responsive.
    ///
    /// # Example (Python)
    /// ```python
    /// adults = await flt.select_async(people)
    /// ```
    fn select_async<'py>(
        &self,
        py: Python<'py>,
        objs: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let mut items: Vec<Option<Py<PyAny>>> = Vec::new();
        let mut values = Vec::new();
        for item in objs.try_iter()? {
            let item = item?;
            values.push(to_value(&item)?);
            items.push(Some(item.unbind()));
        }
        let condition = Arc::clone(&self.condition);

        pyo3_async_runtimes::tokio::future_into_py(py, async move {
            let found = tokio::task::spawn_blocking(move || {
                search::positions(&condition, &values, ErrorPolicy::Fail)
            })
            .await
            .map_err(|e| PyRuntimeError::new_err(format!("Filter task panicked: {}", e)))??;

            let selected: Vec<Py<PyAny>> = found
                .into_iter()
                .filter_map(|index| items.get_mut(index).and_then(Option::take))
                .collect();
            Ok(selected)
        })
    }

    fn __repr__(&self) -> String {
        format!("ObjectFilter(leaves={})", self.condition.leaf_count())
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Install the operator alias table (call once at startup, before `compile`)
///
/// # Arguments
/// * `aliases` - Mapping of operator spelling to canonical key, e.g. {">": "gt"}
/// * `case_insensitive` - Resolve operator names regardless of case
#[pyfunction]
#[pyo3(signature = (aliases=None, case_insensitive=false))]
fn init_config(aliases: Option<HashMap<String, String>>, case_insensitive: bool) -> PyResult<()> {
    config::install(OperatorConfig::new(
        aliases.unwrap_or_default(),
        case_insensitive,
    ))?;
    Ok(())
}

/// Check if the operator config is initialized
#[pyfunction]
fn is_config_initialized() -> bool {
    config::is_initialized()
}

/// Compile a condition spec (dicts and lists) into an `ObjectFilter`
///
/// # Raises
/// ValueError if the spec is malformed or names an unknown operator
#[pyfunction]
fn compile(spec: &Bound<'_, PyAny>) -> PyResult<PyObjectFilter> {
    let value = to_value(spec)?;
    let condition = cache::get_or_parse(&value)?;
    Ok(PyObjectFilter { condition })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn objsearch_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_config, m)?)?;
    m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(compile, m)?)?;
    m.add_class::<PyObjectFilter>()?;
    Ok(())
}
