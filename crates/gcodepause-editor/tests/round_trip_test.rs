use gcodepause_core::PauseOptions;
use gcodepause_editor::LayerFile;
use proptest::prelude::*;

fn print(layer_count: usize, moves_per_layer: usize) -> String {
    let mut text = String::from("G28\n");
    for layer in 1..=layer_count {
        text.push_str(&format!(";{:.1}\n", layer as f64 * 0.2));
        for i in 0..moves_per_layer {
            text.push_str(&format!("G1 X{} Y{} E{}\n", i, layer, i + layer));
        }
    }
    text
}

proptest! {
    #[test]
    fn insert_then_remove_restores_buffer(
        layer_count in 1usize..20,
        moves in 0usize..5,
        pick in any::<prop::sample::Index>(),
        z_offset in 0.1f64..100.0,
        x_pause in 0.1f64..300.0,
        y_pause in 0.1f64..300.0,
        message in "[A-Za-z ]{0,20}",
    ) {
        let text = print(layer_count, moves);
        let mut file = LayerFile::parse("part.gcode", &text).unwrap();
        let layers_before = file.layers().clone();
        let height = file.layers().heights()[pick.index(layer_count)];

        let options = PauseOptions { z_offset, x_pause, y_pause, message: Some(message) };
        let report = file.insert_pause(height, &options).unwrap();
        prop_assert!(report.diagnostics.is_empty());
        prop_assert_eq!(file.layers().len(), layers_before.len());
        prop_assert_eq!(file.line_count(), text.lines().count() + 7);

        for (h, line) in layers_before.iter() {
            let expected = if h > height { line + 7 } else { line };
            prop_assert_eq!(file.layers().get(h), Some(expected));
        }

        file.remove_pause(height).unwrap();
        prop_assert_eq!(file.contents(), text);
        prop_assert_eq!(file.layers(), &layers_before);
        prop_assert!(file.pauses().is_empty());
    }
}
