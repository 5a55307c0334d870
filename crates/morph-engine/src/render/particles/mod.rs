//! Particle morph renderers.
//!
//! Two passes run every frame:
//!
//! 1. [`SimulationPass`] draws a full-screen quad into an offscreen
//!    `Rgba32Float` target, blending the two source position maps.
//! 2. [`DisplayPass`] draws one additive sprite per particle into the
//!    swapchain, fetching each particle's position from that target.
//!
//! [`ParticleSystem`] owns both passes and the ping-pong pair of targets
//! between them.

mod common;
mod display;
mod simulation;
mod system;

pub use display::{DisplayPass, DisplayUniform};
pub use simulation::{SimulationPass, SimulationUniform, BLEND_SPEED, DEFAULT_FREQUENCY};
pub use system::{ParticleFrame, ParticleSources, ParticleSystem};

/// WGSL source of the simulation pass.
pub const SIMULATION_WGSL: &str = include_str!("shaders/simulation.wgsl");

/// WGSL source of the display pass.
pub const DISPLAY_WGSL: &str = include_str!("shaders/particles.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn validated(src: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(src).unwrap_or_else(|e| panic!("{}", e.emit_to_string(src)));
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
            .validate(&module)
            .unwrap_or_else(|e| panic!("validation failed: {e:?}"));
        module
    }

    fn binding_of(module: &naga::Module, name: &str) -> Option<(u32, u32)> {
        module.global_variables.iter().find_map(|(_, var)| {
            let b = var.binding.as_ref()?;
            (var.name.as_deref() == Some(name)).then_some((b.group, b.binding))
        })
    }

    fn has_entry_point(module: &naga::Module, name: &str, stage: naga::ShaderStage) -> bool {
        module.entry_points.iter().any(|ep| ep.name == name && ep.stage == stage)
    }

    #[test]
    fn simulation_shader_is_valid() {
        let module = validated(SIMULATION_WGSL);
        assert!(has_entry_point(&module, "vs_main", naga::ShaderStage::Vertex));
        assert!(has_entry_point(&module, "fs_main", naga::ShaderStage::Fragment));

        assert_eq!(binding_of(&module, "sim"), Some((0, 0)));
        assert_eq!(binding_of(&module, "positions_a"), Some((0, 1)));
        assert_eq!(binding_of(&module, "positions_b"), Some((0, 2)));
    }

    #[test]
    fn simulation_uniform_fields_match() {
        let module = validated(SIMULATION_WGSL);
        let names: Vec<_> = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("SimulationUniform"))
            .map(|(_, ty)| match &ty.inner {
                naga::TypeInner::Struct { members, .. } => {
                    members.iter().filter_map(|m| m.name.clone()).collect()
                }
                _ => Vec::new(),
            })
            .unwrap_or_default();
        assert_eq!(names, ["u_time", "u_frequency", "_pad"]);
    }

    #[test]
    fn display_shader_is_valid() {
        let module = validated(DISPLAY_WGSL);
        assert!(has_entry_point(&module, "vs_main", naga::ShaderStage::Vertex));
        assert!(has_entry_point(&module, "fs_main", naga::ShaderStage::Fragment));

        assert_eq!(binding_of(&module, "display"), Some((0, 0)));
        assert_eq!(binding_of(&module, "positions"), Some((0, 1)));
    }

    #[test]
    fn blend_speed_matches_shader_constant() {
        assert!(SIMULATION_WGSL.contains(&format!("const BLEND_SPEED: f32 = {BLEND_SPEED};")));
    }
}
