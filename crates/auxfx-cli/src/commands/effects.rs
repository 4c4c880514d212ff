//! Effect listing and information command.

use auxfx_config::{DeviceConfig, SessionConfig, SlotConfig};
use auxfx_core::{EffectProps, ParamDescriptor, ParameterInfo};
use auxfx_registry::{EffectCategory, EffectRegistry};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,

    /// Print a session file template for the effect instead of the table
    #[arg(long, requires = "effect")]
    toml: bool,
}

const CATEGORIES: [EffectCategory; 7] = [
    EffectCategory::Dynamics,
    EffectCategory::Distortion,
    EffectCategory::Modulation,
    EffectCategory::TimeBased,
    EffectCategory::Filter,
    EffectCategory::Pitch,
    EffectCategory::Utility,
];

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = EffectRegistry::new();

    let Some(effect_id) = &args.effect else {
        println!("Available Effects");
        println!("=================");
        for category in CATEGORIES {
            println!();
            println!("{}:", category.name());
            for effect in registry.effects_in_category(category) {
                println!("  {:18} - {}", effect.id, effect.description);
            }
        }
        println!();
        println!("Use 'auxfx effects <id>' for detailed parameter info.");
        return Ok(());
    };

    let effect = registry
        .get(effect_id)
        .ok_or_else(|| anyhow::anyhow!("Unknown effect: {}", effect_id))?;
    let props = EffectProps::default_for(effect.kind);

    if args.toml {
        let session = SessionConfig::new(DeviceConfig::default())
            .with_slot(SlotConfig::from_props(&props, 1.0));
        print!("{}", session.to_toml()?);
        return Ok(());
    }

    println!("{} ({})", effect.name, effect.id);
    println!("{}", "=".repeat(effect.name.len() + effect.id.len() + 3));
    println!();
    println!("{}", effect.description);
    println!("Category: {}", effect.category.name());
    println!();

    if effect.param_count == 0 {
        println!("No parameters.");
        return Ok(());
    }

    println!("  {:26}  {:>12}  {}", "Parameter", "Default", "Range");
    println!("  {:26}  {:>12}  {}", "---------", "-------", "-----");
    for info in (0..props.param_count()).filter_map(|i| props.param_info(i)) {
        println!(
            "  {:26}  {:>12}  {}",
            info.string_id,
            format_value(&info, info.default),
            format_range(&info)
        );
    }

    let example: Vec<String> = (0..props.param_count().min(2))
        .filter_map(|i| props.param_info(i))
        .map(|info| format!("--param {}={}", info.string_id, info.default))
        .collect();
    println!();
    println!("Example usage:");
    println!();
    println!(
        "  auxfx process input.wav output.wav --effect {} {}",
        effect.id,
        example.join(" ")
    );

    Ok(())
}

fn format_value(info: &ParamDescriptor, value: f32) -> String {
    format!("{}{}", value, info.unit.suffix())
}

fn format_range(info: &ParamDescriptor) -> String {
    let range = format!(
        "{} to {}",
        format_value(info, info.min),
        format_value(info, info.max)
    );
    if info.stepped {
        format!("{} (whole numbers)", range)
    } else {
        range
    }
}
