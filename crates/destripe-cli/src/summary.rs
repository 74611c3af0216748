use console::Style;
use destripe_core::pipeline::config::PipelineConfig;
use destripe_core::pipeline::PipelineOutput;
use destripe_core::plan::{CalibrationPlan, CteDecision};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    enabled: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            enabled: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn on_off(s: &Styles, on: bool) -> String {
    if on {
        s.enabled.apply_to("yes").to_string()
    } else {
        s.disabled.apply_to("no").to_string()
    }
}

/// Print the header keywords and the stages a run will perform.
pub fn print_plan_summary(config: &PipelineConfig, plan: &CalibrationPlan) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("ACS/WFC Calibration"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(19)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Header"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("SUBARRAY"),
        s.value.apply_to(if plan.header.subarray { "T" } else { "F" })
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("APERTURE"),
        s.value.apply_to(&plan.header.aperture)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("PCTECORR"),
        s.value.apply_to(&plan.header.pctecorr)
    );
    println!();

    println!("  {}", s.header.apply_to("Stages"));
    println!("    {:<12}{}", s.label.apply_to("acsccd"), on_off(&s, true));
    println!(
        "    {:<12}{}",
        s.label.apply_to("destripe"),
        on_off(&s, plan.destripe)
    );
    if plan.destripe {
        for (label, mask) in [("SCI1 mask", &config.masks.sci1), ("SCI2 mask", &config.masks.sci2)] {
            if let Some(mask) = mask {
                println!(
                    "      {:<10}{}",
                    s.label.apply_to(label),
                    s.path.apply_to(mask.display())
                );
            }
        }
    }
    match &plan.cte {
        CteDecision::Perform => {
            println!("    {:<12}{}", s.label.apply_to("acscte"), on_off(&s, true));
        }
        reason => {
            println!("    {:<12}{}", s.label.apply_to("acscte"), on_off(&s, false));
            if !matches!(reason, CteDecision::Disabled) {
                println!("      {}", s.disabled.apply_to(reason));
            }
        }
    }
    if plan.force_pctecorr {
        println!(
            "      {}",
            s.label.apply_to("PCTECORR set to PERFORM on the subarray intermediate")
        );
    }
    println!("    {:<12}{}", s.label.apply_to("acs2d"), on_off(&s, true));
    println!(
        "    {:<12}{}",
        s.label.apply_to("cleanup"),
        on_off(&s, !config.keep_intermediates)
    );
    println!();
}

/// Print the final product names.
pub fn print_output(output: &PipelineOutput) {
    println!("{}", "_".repeat(58));
    println!(" ");
    for line in output.report_lines() {
        println!("{line}");
    }
    println!(" ");
}
