//! Front-end checks for program sources.
//!
//! wgpu reports shader errors through its device error callback, which by
//! default panics without telling us which program failed. Running naga first
//! turns a bad source into a `ShaderError` with the full diagnostic.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::ShaderStage;

use super::{ProgramKind, ShaderError};

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

/// Parses and validates `source` as program `kind`.
pub fn check_source(kind: ProgramKind, source: &str) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| {
        let log = err.emit_to_string(source);
        log::error!("{kind} shader: {log}");
        ShaderError::Compile { program: kind, log }
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| {
            let log = err.emit_to_string(source);
            log::error!("{kind} shader: {log}");
            ShaderError::Compile { program: kind, log }
        })?;

    for (stage, name) in [
        (ShaderStage::Vertex, VERTEX_ENTRY),
        (ShaderStage::Fragment, FRAGMENT_ENTRY),
    ] {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == stage && ep.name == name);
        if !found {
            let log = format!("missing {stage:?} entry point `{name}`");
            log::error!("{kind} shader: {log}");
            return Err(ShaderError::Link { program: kind, log });
        }
    }

    log::trace!("{kind} shader validated");
    Ok(())
}

/// Checks every built-in program.
pub fn check_all() -> Result<(), ShaderError> {
    ProgramKind::ALL
        .into_iter()
        .try_for_each(|kind| check_source(kind, kind.source()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_programs_validate() {
        for kind in ProgramKind::ALL {
            if let Err(err) = check_source(kind, kind.source()) {
                panic!("{err}");
            }
        }
    }

    #[test]
    fn syntax_error_is_compile_error() {
        let err = check_source(ProgramKind::Rect, "fn vs_main( {").unwrap_err();
        assert!(matches!(err, ShaderError::Compile { program: ProgramKind::Rect, .. }));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn type_error_is_compile_error() {
        let src = r#"
            @vertex fn vs_main() -> @builtin(position) vec4<f32> { return 1.0; }
            @fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
        "#;
        let err = check_source(ProgramKind::Line, src).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn missing_fragment_entry_is_link_error() {
        let src = r#"
            @vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }
        "#;
        let err = check_source(ProgramKind::Sprite, src).unwrap_err();
        match err {
            ShaderError::Link { program, log } => {
                assert_eq!(program, ProgramKind::Sprite);
                assert!(log.contains("fs_main"));
            }
            other => panic!("expected link error, got {other}"),
        }
    }
}
