//! Control panel for the diorama
//!
//! Renders one widget per bridge control. The panel never touches the
//! scene itself; edited values are fanned out by the bridge on the next
//! sync.

use imgui::{Condition, Ui};

use crate::diorama::bridge::{Bridge, ControlKind};

pub fn diorama_panel(ui: &Ui, bridge: &mut Bridge) {
    ui.window("Haunted House")
        .size([300.0, 420.0], Condition::FirstUseEver)
        .position([10.0, 10.0], Condition::FirstUseEver)
        .build(|| {
            for control in bridge.controls_mut() {
                match control.kind {
                    ControlKind::Slider { min, max } => {
                        ui.slider(control.label, min, max, &mut control.value);
                    }
                    ControlKind::Checkbox => {
                        let mut on = control.value > 0.5;
                        if ui.checkbox(control.label, &mut on) {
                            control.value = if on { 1.0 } else { 0.0 };
                        }
                    }
                }
            }
        });
}
