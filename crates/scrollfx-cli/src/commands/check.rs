use anyhow::{bail, Result};

use scrollfx_core::{AppConfig, EffectParams};
use scrollfx_engine::scroll::ScrollConfigExt;
use scrollfx_engine::EffectRegistry;

/// Build a registry from the declared bindings, collecting rejections
fn build_registry(config: &AppConfig) -> (EffectRegistry, Vec<String>) {
    let mut registry = EffectRegistry::new();
    let mut rejected = Vec::new();
    for binding in &config.effects.bindings {
        if let Err(e) = registry.register(binding.clone()) {
            rejected.push(e.to_string());
        }
    }
    (registry, rejected)
}

fn describe(params: &EffectParams) -> String {
    match params {
        EffectParams::Parallax {
            speed,
            trigger,
            scrub_ms,
        } => match trigger {
            Some(trigger) => format!(
                "speed {}, scrub {}ms, measured on '{}'",
                speed, scrub_ms, trigger
            ),
            None => format!("speed {}, scrub {}ms", speed, scrub_ms),
        },
        EffectParams::Reveal { threshold, delay_ms } => {
            format!("threshold {}, delay {}ms", threshold, delay_ms)
        }
        EffectParams::ProgressBar => "page progress".to_string(),
        EffectParams::Magnetic {
            attraction,
            duration_ms,
        } => format!("attraction {}, {}ms", attraction, duration_ms),
        EffectParams::ScrollClass { classes } => classes
            .iter()
            .map(|t| format!("'{}' past {}px", t.class, t.above))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

pub fn run(config: &AppConfig, json: bool) -> Result<()> {
    let (registry, rejected) = build_registry(config);

    if json {
        let bindings: Vec<_> = registry.bindings().collect();
        println!("{}", serde_json::to_string_pretty(&bindings)?);
    } else {
        print_summary(config, &registry);
    }

    if !rejected.is_empty() {
        for reason in &rejected {
            eprintln!("  [ERROR: {}]", reason);
        }
        bail!("{} effect binding(s) rejected", rejected.len());
    }

    Ok(())
}

fn print_summary(config: &AppConfig, registry: &EffectRegistry) {
    println!(
        "Server: http://{}:{}/ serving {}",
        config.server.host,
        config.server.port,
        config.asset_root().display()
    );
    println!(
        "Scroll: smooth={}, duration={}ms, rate={:.3}/s",
        config.scroll.smooth_enabled,
        config.scroll.animation_duration_ms,
        config.scroll.effective_smoothing_rate()
    );

    if registry.is_empty() {
        println!("\nNo effect bindings declared.");
    } else {
        println!("\nEffect bindings ({}):\n", registry.len());
        for binding in registry.bindings() {
            println!("  {} - {} ({})", binding.target, binding.kind(), describe(&binding.params));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollfx_core::EffectBinding;

    #[test]
    fn test_duplicates_are_reported() {
        let mut config = AppConfig::default();
        config.effects.bindings = vec![
            EffectBinding::parallax("hero-bg", 0.15),
            EffectBinding::reveal("about"),
            EffectBinding::parallax("hero-bg", 0.3),
        ];

        let (registry, rejected) = build_registry(&config);
        assert_eq!(registry.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].contains("hero-bg"));
        assert!(run(&config, true).is_err());
    }

    #[test]
    fn test_describe_scroll_classes() {
        let binding = EffectBinding::scroll_class("header");
        assert_eq!(
            describe(&binding.params),
            "'scrolled' past 40px, 'shrink' past 120px"
        );
    }
}
