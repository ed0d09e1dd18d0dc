use std::collections::BTreeMap;

use dawmaker_codegen::emitters::create_emitter;
use dawmaker_codegen::{export_project, generate, generate_build_files, CodeGenerator, ExportPlan};
use dawmaker_model::{Framework, ProjectMeta, ProjectTemplate, WidgetDescriptor, WidgetKind};
use pretty_assertions::assert_eq;

fn sample_layout() -> Vec<WidgetDescriptor> {
    ProjectTemplate::Synthesizer.widgets()
}

/// Source file text of a framework's output, concatenated in path order.
fn all_sources(framework: Framework, widgets: &[WidgetDescriptor]) -> String {
    let output = generate(framework, widgets, "MyPlugin", "Acme").unwrap();
    output.files().values().cloned().collect::<Vec<_>>().join("\n")
}

#[test]
fn test_generation_is_deterministic() {
    let widgets = sample_layout();
    for framework in Framework::ALL {
        let meta = ProjectMeta::new("MyPlugin", "Acme", framework);
        let generator = CodeGenerator::new(framework);
        let first = generator.generate(&widgets, &meta).unwrap();
        let second = generator.generate(&widgets, &meta).unwrap();
        assert_eq!(first, second, "{framework} output differs between runs");
    }
}

#[test]
fn test_every_kind_has_declaration_and_setup() {
    for framework in Framework::ALL {
        let emitter = create_emitter(framework);
        for kind in WidgetKind::catalog() {
            let widgets = vec![WidgetDescriptor::placed(kind.clone(), "Probe", 10, 10)];
            let meta = ProjectMeta::new("MyPlugin", "Acme", framework);
            let plan = ExportPlan::build(&widgets, &meta, emitter.naming_rules()).unwrap();
            let mut ctx = emitter.new_context();

            let declaration = emitter.emit_declaration(&plan.widgets[0], &plan, &mut ctx);
            let setup = emitter.emit_setup(&plan.widgets[0], &plan, &mut ctx);
            assert!(
                !declaration.trim().is_empty(),
                "{framework}: empty declaration for {}",
                kind.display_name()
            );
            assert!(
                !setup.trim().is_empty(),
                "{framework}: empty setup for {}",
                kind.display_name()
            );
            assert!(emitter.emit_midi_binding(&plan.widgets[0], &plan, &mut ctx).is_none());
        }
    }
}

#[test]
fn test_duplicate_names_get_distinct_identifiers() {
    let widgets = vec![
        WidgetDescriptor::placed(WidgetKind::Knob, "Gain", 10, 10),
        WidgetDescriptor::placed(WidgetKind::Knob, "Gain", 140, 10),
    ];
    for framework in Framework::ALL {
        let emitter = create_emitter(framework);
        let meta = ProjectMeta::new("MyPlugin", "Acme", framework);
        let plan = ExportPlan::build(&widgets, &meta, emitter.naming_rules()).unwrap();
        assert_eq!(plan.widgets[0].ident, "Gain");
        assert_eq!(plan.widgets[1].ident, "Gain_2");

        let sources = all_sources(framework, &widgets);
        assert!(sources.contains("Gain_2"), "{framework} lost the second Gain");
    }
}

#[test]
fn test_bad_name_is_sanitized_and_stable() {
    let widgets = vec![WidgetDescriptor::placed(WidgetKind::Slider, "1 Bad Name!", 10, 10)];
    for framework in Framework::ALL {
        let emitter = create_emitter(framework);
        let meta = ProjectMeta::new("MyPlugin", "Acme", framework);
        let first = ExportPlan::build(&widgets, &meta, emitter.naming_rules()).unwrap();
        let second = ExportPlan::build(&widgets, &meta, emitter.naming_rules()).unwrap();

        let ident = &first.widgets[0].ident;
        assert_eq!(ident, &second.widgets[0].ident);
        assert!(ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
        assert!(all_sources(framework, &widgets).contains(ident.as_str()));
    }
}

/// Declaration, setup and MIDI glue of every widget, keyed by identifier.
fn per_widget_blocks(
    framework: Framework,
    widgets: &[WidgetDescriptor],
) -> BTreeMap<String, (String, String, Option<String>)> {
    let emitter = create_emitter(framework);
    let meta = ProjectMeta::new("MyPlugin", "Acme", framework);
    let plan = ExportPlan::build(widgets, &meta, emitter.naming_rules()).unwrap();
    plan.widgets
        .iter()
        .map(|widget| {
            let mut ctx = emitter.new_context();
            let declaration = emitter.emit_declaration(widget, &plan, &mut ctx);
            let setup = emitter.emit_setup(widget, &plan, &mut ctx);
            let midi = emitter.emit_midi_binding(widget, &plan, &mut ctx);
            (widget.ident.clone(), (declaration, setup, midi))
        })
        .collect()
}

#[test]
fn test_declaration_order_follows_input_order() {
    let a = WidgetDescriptor::placed(WidgetKind::Knob, "Alpha", 10, 10).with_midi(20, 1);
    let b = WidgetDescriptor::placed(WidgetKind::Slider, "Beta", 140, 10).with_midi(21, 2);

    for framework in Framework::ALL {
        let forward = all_sources(framework, &[a.clone(), b.clone()]);
        let backward = all_sources(framework, &[b.clone(), a.clone()]);

        let order = |text: &str| text.find("Alpha").unwrap() < text.find("Beta").unwrap();
        assert!(order(&forward), "{framework}: Alpha should come first");
        assert!(!order(&backward), "{framework}: Beta should come first");
    }
}

#[test]
fn test_reordering_keeps_per_widget_content() {
    let widgets = vec![
        WidgetDescriptor::placed(WidgetKind::Knob, "Alpha", 10, 10).with_midi(20, 1),
        WidgetDescriptor::placed(WidgetKind::Slider, "Beta", 140, 10).with_midi(21, 2),
        WidgetDescriptor::placed(WidgetKind::ToggleButton, "Bypass", 10, 140).with_midi(64, 1),
        WidgetDescriptor::placed(WidgetKind::XyPad, "Pad", 140, 140),
        WidgetDescriptor::placed(WidgetKind::VuMeter, "Level", 300, 10),
    ];
    let mut reversed = widgets.clone();
    reversed.reverse();

    for framework in Framework::ALL {
        let forward = per_widget_blocks(framework, &widgets);
        let backward = per_widget_blocks(framework, &reversed);
        assert_eq!(forward.len(), widgets.len());
        assert_eq!(forward, backward, "{framework}: widget content depends on order");
    }
}

#[test]
fn test_juce_cutoff_scenario() {
    let mut knob = WidgetDescriptor::placed(WidgetKind::Knob, "Cutoff", 10, 10);
    knob.bounds.width = 120;
    knob.bounds.height = 120;

    let meta = ProjectMeta::new("MyPlugin", "Acme", Framework::Juce);
    let output = CodeGenerator::new(Framework::Juce).generate(&[knob], &meta).unwrap();

    let editor = output.get("Source/PluginEditor.h").unwrap();
    assert!(editor.contains("juce::Slider Cutoff;"));
    let setup = output.get("Source/PluginEditor.cpp").unwrap();
    assert!(setup.contains("juce::Slider::RotaryHorizontalVerticalDrag"));

    let cmake = output.get("CMakeLists.txt").unwrap();
    assert!(cmake.contains("\"MyPlugin\""));
    assert!(cmake.contains("\"Acme\""));
}

#[test]
fn test_unwritable_output_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("not-a-dir");
    std::fs::write(&blocked, "occupied").unwrap();

    let ok = export_project(Framework::Juce, &blocked, &sample_layout(), "MyPlugin", "Acme");
    assert!(!ok);
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(std::fs::read_to_string(&blocked).unwrap(), "occupied");
}

#[test]
fn test_keyboard_without_binding() {
    let widgets = vec![WidgetDescriptor::placed(WidgetKind::MidiKeyboard, "Keys", 10, 200)];
    for framework in Framework::ALL {
        let output = generate(framework, &widgets, "MyPlugin", "Acme").unwrap();
        assert!(output.file_count() > 0);
        assert!(all_sources(framework, &widgets).contains("Keys"));
    }
}

#[test]
fn test_build_files_independent_of_widgets() {
    for framework in Framework::ALL {
        let build = generate_build_files(framework, "MyPlugin", "Acme").unwrap();
        let meta = ProjectMeta::new("MyPlugin", "Acme", framework);
        let full = CodeGenerator::new(framework).generate(&sample_layout(), &meta).unwrap();
        for (path, content) in build.files() {
            assert_eq!(full.get(path), Some(content.as_str()));
        }
    }
}

#[test]
fn test_every_template_exports_for_every_framework() {
    for template in ProjectTemplate::ALL {
        for framework in Framework::ALL {
            let dir = tempfile::tempdir().unwrap();
            let ok = export_project(
                framework,
                dir.path(),
                &template.widgets(),
                template.name(),
                "Acme",
            );
            assert!(ok, "{} / {framework} export failed", template.slug());
        }
    }
}
