//! Integration tests for the view engine registry.
//!
//! The registry is process-wide, so every test registers under its own name.

use hocon_config::{Config, ViewEngine, ViewError, add_engine, engine_names, get_engine, parse_string};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Records the template directory it was initialized with.
#[derive(Default)]
struct RecordingEngine {
    dir: Mutex<Option<PathBuf>>,
}

impl ViewEngine for RecordingEngine {
    fn init(&self, cfg: &Config, base_dir: &Path) -> Result<(), ViewError> {
        let dir = cfg
            .string("view.dir")
            .ok_or_else(|| ViewError::Init("view.dir is not configured".to_string()))?;
        *self.dir.lock() = Some(base_dir.join(dir));
        Ok(())
    }
}

#[test]
fn test_register_and_init() {
    let engine = Arc::new(RecordingEngine::default());
    add_engine("recording", Some(engine.clone())).unwrap();

    let mut cfg = parse_string("view.dir = views\nprod { view.dir = compiled }").unwrap();
    let registered = get_engine("recording").expect("engine registered");
    registered.init(&cfg, Path::new("/app")).unwrap();
    assert_eq!(*engine.dir.lock(), Some(PathBuf::from("/app/views")));

    cfg.set_profile("prod").unwrap();
    registered.init(&cfg, Path::new("/app")).unwrap();
    assert_eq!(*engine.dir.lock(), Some(PathBuf::from("/app/compiled")));
}

#[test]
fn test_init_error_surfaces() {
    add_engine("unconfigured", Some(Arc::new(RecordingEngine::default()))).unwrap();
    let err = get_engine("unconfigured")
        .unwrap()
        .init(&Config::new(), Path::new("."))
        .unwrap_err();
    assert_eq!(err.to_string(), "view: view.dir is not configured");
}

#[test]
fn test_duplicate_and_nil_registration() {
    add_engine("go", Some(Arc::new(RecordingEngine::default()))).unwrap();

    let err = add_engine("go", Some(Arc::new(RecordingEngine::default()))).unwrap_err();
    assert_eq!(err.to_string(), "view: engine name 'go' is already added, skip it");

    let err = add_engine("custom", None).unwrap_err();
    assert_eq!(err.to_string(), "view: engine value is nil");
    assert!(get_engine("custom").is_none());
    assert!(engine_names().contains(&"go".to_string()));
}

#[test]
fn test_unknown_engine() {
    assert!(get_engine("never-registered").is_none());
}
