//! Sketch generator
//!
//! Section order:
//! 1. banner and includes
//! 2. module declarations
//! 3. plugin globals
//! 4. status timer state
//! 5. command dispatch
//! 6. `setup()`
//! 7. `loop()`

use std::collections::HashSet;

use contracts::{is_reserved_identifier, ContractError, ResolvedModule, Scope};
use tracing::{debug, instrument};

use crate::context::CodeGenContext;
use crate::literal::render_literal;
use crate::writer::SourceWriter;

pub const BANNER: &str =
    "// Generated by sketchgen. Manual edits are overwritten on the next run.";

const FIXED_INCLUDES: [&str; 2] = ["<Arduino.h>", "<string.h>"];

/// Render the complete sketch source.
///
/// Pure: equal contexts produce byte-identical output.
///
/// # Errors
/// `ConfigValidation` if a parameter value has no C++ literal form, or a
/// module ID collides with a keyword or a name the sketch already uses
#[instrument(
    name = "codegen_generate",
    skip_all,
    fields(modules = ctx.modules.len(), fragments = ctx.fragments.len())
)]
pub fn generate(ctx: &CodeGenContext) -> Result<String, ContractError> {
    let mut w = SourceWriter::new();

    write_includes(&mut w, ctx);
    write_declarations(&mut w, ctx)?;
    write_globals(&mut w, ctx);
    write_timer(&mut w, ctx);
    write_dispatch(&mut w, ctx);
    write_setup(&mut w, ctx);
    write_loop(&mut w, ctx);

    let source = w.finish();
    debug!(bytes = source.len(), "sketch generated");
    Ok(source)
}

fn include_line(header: &str) -> String {
    if header.starts_with('<') || header.starts_with('"') {
        format!("#include {header}")
    } else {
        format!("#include \"{header}\"")
    }
}

fn write_includes(w: &mut SourceWriter, ctx: &CodeGenContext) {
    w.line(BANNER);
    w.blank();

    let mut headers: Vec<&str> = FIXED_INCLUDES.to_vec();
    headers.extend(ctx.modules.iter().flat_map(|m| m.header_files.iter().map(String::as_str)));
    headers.extend(ctx.fragments.iter().flat_map(|f| f.includes.iter().map(String::as_str)));

    let mut seen = HashSet::new();
    for header in headers {
        if seen.insert(header) {
            w.line(include_line(header));
        }
    }
}

fn constructor_args(module: &ResolvedModule) -> Result<Vec<String>, ContractError> {
    module
        .arguments
        .iter()
        .map(|value| {
            render_literal(value).map_err(|e| match e {
                ContractError::ConfigValidation { message, .. } => {
                    ContractError::config_validation(
                        format!("firmware_module.{}.parameters", module.id),
                        message,
                    )
                }
                other => other,
            })
        })
        .collect()
}

fn write_declarations(w: &mut SourceWriter, ctx: &CodeGenContext) -> Result<(), ContractError> {
    if ctx.modules.is_empty() {
        return Ok(());
    }
    w.blank();
    for module in &ctx.modules {
        if is_reserved_identifier(&module.id) {
            return Err(ContractError::config_validation(
                format!("firmware_module.{}", module.id),
                format!("'{}' is reserved in the generated sketch", module.id),
            ));
        }
        let args = constructor_args(module)?;
        if args.is_empty() {
            w.line(format!("{} {};", module.class_name, module.id));
        } else {
            w.line(format!("{} {}({});", module.class_name, module.id, args.join(", ")));
        }
    }
    Ok(())
}

fn write_globals(w: &mut SourceWriter, ctx: &CodeGenContext) {
    for fragment in &ctx.fragments {
        let mut blocks = fragment.blocks_in(Scope::Global).peekable();
        if blocks.peek().is_none() {
            continue;
        }
        w.blank();
        w.line(format!("// {}", fragment.plugin));
        for block in blocks {
            w.block(&block.code);
        }
    }
}

fn write_timer(w: &mut SourceWriter, ctx: &CodeGenContext) {
    w.blank();
    w.line(format!(
        "const unsigned long STATUS_UPDATE_INTERVAL_MS = {}UL;",
        ctx.status_interval_ms()
    ));
    w.line("unsigned long last_status_update = 0;");
}

fn write_dispatch(w: &mut SourceWriter, ctx: &CodeGenContext) {
    w.blank();
    w.open("bool dispatch_command(const char* module, const char* command, const char* arg)");
    for module in ctx.modules.iter().filter(|m| !m.commands.is_empty()) {
        w.open(format!("if (strcmp(module, \"{}\") == 0)", module.id));
        for command in &module.commands {
            w.open(format!("if (strcmp(command, \"{command}\") == 0)"));
            w.line(format!("{}.{command}(arg);", module.id));
            w.line("return true;");
            w.close();
        }
        w.line("return false;");
        w.close();
    }
    w.line("return false;");
    w.close();
}

fn write_scope(w: &mut SourceWriter, ctx: &CodeGenContext, scope: Scope) {
    for fragment in &ctx.fragments {
        for block in fragment.blocks_in(scope) {
            w.block(&block.code);
        }
    }
}

fn write_setup(w: &mut SourceWriter, ctx: &CodeGenContext) {
    w.blank();
    w.open("void setup()");
    w.line(format!("Serial.begin({});", ctx.baud_rate));
    for module in &ctx.modules {
        w.line(format!("{}.begin();", module.id));
    }
    write_scope(w, ctx, Scope::Setup);
    w.close();
}

fn write_loop(w: &mut SourceWriter, ctx: &CodeGenContext) {
    w.blank();
    w.open("void loop()");
    write_scope(w, ctx, Scope::Loop);
    w.line("unsigned long now = millis();");
    w.open("if (now - last_status_update >= STATUS_UPDATE_INTERVAL_MS)");
    w.line("last_status_update = now;");
    for module in &ctx.modules {
        w.line(format!("{}.update();", module.id));
    }
    write_scope(w, ctx, Scope::Update);
    w.close();
    w.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Category, DataType, Fragment, ParamValue, Port};
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn temp_sensor(id: &str, arguments: Vec<ParamValue>) -> ResolvedModule {
        ResolvedModule {
            id: id.into(),
            type_id: "temp_sensor".into(),
            class_name: "TempSensor".into(),
            header_files: vec!["temp_sensor.h".into()],
            arguments,
            parameters: BTreeMap::new(),
            inputs: vec![],
            outputs: vec![Port {
                name: "temperature".into(),
                data_type: DataType::Float,
                category: Category::new(Category::ENVIRONMENTAL),
            }],
            commands: vec!["calibrate".into()],
            dependencies: vec!["DHT22".into()],
        }
    }

    fn ctx(modules: Vec<ResolvedModule>, fragments: Vec<Fragment>) -> CodeGenContext {
        CodeGenContext::new(modules, fragments, Duration::from_secs(5), 57600)
    }

    const EXPECTED_SINGLE_MODULE: &str = r#"// Generated by sketchgen. Manual edits are overwritten on the next run.

#include <Arduino.h>
#include <string.h>
#include "temp_sensor.h"

TempSensor t1(4);

const unsigned long STATUS_UPDATE_INTERVAL_MS = 5000UL;
unsigned long last_status_update = 0;

bool dispatch_command(const char* module, const char* command, const char* arg) {
  if (strcmp(module, "t1") == 0) {
    if (strcmp(command, "calibrate") == 0) {
      t1.calibrate(arg);
      return true;
    }
    return false;
  }
  return false;
}

void setup() {
  Serial.begin(57600);
  t1.begin();
}

void loop() {
  unsigned long now = millis();
  if (now - last_status_update >= STATUS_UPDATE_INTERVAL_MS) {
    last_status_update = now;
    t1.update();
  }
}
"#;

    #[test]
    fn test_single_module_layout() {
        let source = generate(&ctx(vec![temp_sensor("t1", vec![ParamValue::Integer(4)])], vec![]))
            .unwrap();
        assert_eq!(source, EXPECTED_SINGLE_MODULE);
    }

    #[test]
    fn test_fragments_placed_by_scope_in_plugin_order() {
        let mut first = Fragment::new("first");
        first
            .include("<ros.h>")
            .push(Scope::Global, "int first_global;")
            .push(Scope::Setup, "first_setup();")
            .push(Scope::Loop, "first_loop();")
            .push(Scope::Update, "first_update();");
        let mut second = Fragment::new("second");
        second
            .include("<Arduino.h>")
            .push(Scope::Update, "second_update();\nif (x) {\n  y();\n}");

        let source = generate(&ctx(vec![temp_sensor("t1", vec![])], vec![first, second])).unwrap();

        assert_eq!(source.matches("#include <Arduino.h>").count(), 1);
        assert!(source.contains("#include \"temp_sensor.h\"\n#include <ros.h>\n"));
        assert!(source.contains("TempSensor t1;\n"));
        assert!(source.contains("\n// first\nint first_global;\n"));
        assert!(source.contains("  t1.begin();\n  first_setup();\n}"));
        assert!(source.contains("void loop() {\n  first_loop();\n  unsigned long now = millis();"));
        assert!(source.contains(
            "    t1.update();\n    first_update();\n    second_update();\n    if (x) {\n      y();\n    }\n"
        ));

        let global = source.find("int first_global;").unwrap();
        let timer = source.find("STATUS_UPDATE_INTERVAL_MS =").unwrap();
        let decl = source.find("TempSensor t1;").unwrap();
        assert!(decl < global && global < timer);
    }

    #[test]
    fn test_no_modules_still_valid_sketch() {
        let source = generate(&ctx(vec![], vec![])).unwrap();
        assert!(source.contains("void setup() {\n  Serial.begin(57600);\n}"));
        assert!(source.contains("bool dispatch_command(const char* module, const char* command, const char* arg) {\n  return false;\n}"));
    }

    #[test]
    fn test_non_finite_argument_names_module() {
        let err = generate(&ctx(
            vec![temp_sensor("t1", vec![ParamValue::Float(f64::NAN)])],
            vec![],
        ))
        .unwrap_err();
        match err {
            ContractError::ConfigValidation { field, .. } => {
                assert_eq!(field, "firmware_module.t1.parameters")
            }
            other => panic!("expected ConfigValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_module_id_rejected() {
        for id in ["now", "loop", "nh"] {
            let err = generate(&ctx(vec![temp_sensor(id, vec![])], vec![])).unwrap_err();
            assert!(
                matches!(err, ContractError::ConfigValidation { ref field, .. } if *field == format!("firmware_module.{id}")),
                "{id}: got {err:?}"
            );
        }
    }

    #[test]
    fn test_mixed_argument_literals() {
        let module = temp_sensor(
            "t1",
            vec![
                ParamValue::Integer(4),
                ParamValue::Float(1.0),
                ParamValue::String("air".into()),
                ParamValue::Bool(false),
            ],
        );
        let source = generate(&ctx(vec![module], vec![])).unwrap();
        assert!(source.contains("TempSensor t1(4, 1.0, \"air\", false);"));
    }

    proptest! {
        /// Generation is a pure function of the context.
        #[test]
        fn generate_is_deterministic(
            ids in proptest::collection::btree_set("[a-z][a-z0-9_]{0,6}", 0..5),
            pins in proptest::collection::vec(0i64..64, 5),
            interval_ms in 1u64..100_000,
        ) {
            let modules: Vec<_> = ids
                .iter()
                .filter(|id| !is_reserved_identifier(id))
                .zip(&pins)
                .map(|(id, pin)| temp_sensor(id, vec![ParamValue::Integer(*pin)]))
                .collect();
            let ctx = CodeGenContext::new(
                modules,
                vec![],
                Duration::from_millis(interval_ms),
                115200,
            );
            let a = generate(&ctx).unwrap();
            let b = generate(&ctx.clone()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
