//! Python bindings for the host application.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{FormatError, ReportType, SettingsStore, TracingSink};

fn to_py_err(err: FormatError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn load_settings(settings_toml: Option<&str>) -> PyResult<SettingsStore> {
    match settings_toml {
        Some(doc) => SettingsStore::from_toml_str(doc).map_err(to_py_err),
        None => Ok(SettingsStore::default()),
    }
}

/// Summarize pasted text.
///
/// Parameters
/// ----------
/// text : str
///     Raw pasted page.
/// report_type : str
///     "province-logs", "province-news" or "kingdom-news".
/// settings_toml : str | None
///     Settings document with one table per report type.
///
/// Raises
/// ------
/// ValueError
///     On a structural failure or invalid settings.
#[pyfunction]
#[pyo3(signature = (text, report_type, settings_toml=None))]
pub fn format_report(text: &str, report_type: &str, settings_toml: Option<&str>) -> PyResult<String> {
    let report_type: ReportType = report_type.parse().map_err(to_py_err)?;
    let store = load_settings(settings_toml)?;
    crate::format_report(text, report_type, store.get(report_type), &TracingSink::default())
        .map_err(to_py_err)
}

/// Re-apply settings to already rendered text without re-parsing.
#[pyfunction]
#[pyo3(signature = (rendered, report_type, settings_toml=None))]
pub fn apply_settings(rendered: &str, report_type: &str, settings_toml: Option<&str>) -> PyResult<String> {
    let report_type: ReportType = report_type.parse().map_err(to_py_err)?;
    let store = load_settings(settings_toml)?;
    Ok(crate::apply_settings(rendered, report_type, store.get(report_type)))
}

/// Clean pasted text the way the parsers see it.
#[pyfunction]
pub fn normalize_text(text: &str) -> String {
    crate::normalize::normalize_text(text)
}

/// Install a tracing subscriber ("text" or "json").
#[pyfunction]
#[pyo3(signature = (level="info", format="text"))]
pub fn init_logging(level: &str, format: &str) -> PyResult<()> {
    let format = format.parse().map_err(PyValueError::new_err)?;
    crate::logging::init_logging(level, format);
    Ok(())
}

#[pymodule]
fn utopia_formatter_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(format_report, m)?)?;
    m.add_function(wrap_pyfunction!(apply_settings, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_text, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}
