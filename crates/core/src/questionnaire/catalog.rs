use super::{FieldDescriptor, FieldOption, SectionSchema};
use crate::model::GoalId;

fn options(pairs: &[(&str, &str)]) -> Vec<FieldOption> {
    pairs
        .iter()
        .map(|(value, label)| FieldOption::new(*value, *label))
        .collect()
}

/// `"0"` to `"max"`, where the top value means every listed aspect is covered.
fn counted(max: u32, noun: &str) -> Vec<FieldOption> {
    (0..=max)
        .map(|n| {
            let label = match n {
                0 => format!("No {noun}s addressed"),
                1 => format!("1 {noun} addressed"),
                n if n == max => format!("All {n} {noun}s addressed"),
                n => format!("{n} {noun}s addressed"),
            };
            FieldOption::new(n.to_string(), label)
        })
        .collect()
}

fn measures_scale() -> Vec<FieldOption> {
    options(&[
        ("none", "No measures"),
        ("one", "One measure"),
        ("two", "Two measures"),
        ("three", "Three measures"),
        ("four", "Four measures"),
        ("five", "Five or more measures"),
    ])
}

fn artificialisation_scale(name: String) -> FieldDescriptor {
    FieldDescriptor::single_choice(
        name,
        "Share of the plot that is sealed or built over",
        options(&[
            ("100", "100%"),
            ("80", "About 80%"),
            ("60", "About 60%"),
            ("40", "About 40%"),
            ("20", "About 20%"),
            ("0", "None, the plot is fully renaturalised"),
        ]),
    )
}

fn notes(goal: GoalId) -> FieldDescriptor {
    FieldDescriptor::free_text(goal.notes_field(), "Evidence and notes")
}

fn checks(goal: GoalId, pairs: &[(&str, &str)]) -> FieldDescriptor {
    FieldDescriptor::multi_choice(
        format!("sdg{}_checks", goal.number()),
        "Which of these apply?",
        options(pairs),
    )
}

/// Builds the section for one goal, including the experimental 18 to 27 range.
#[allow(clippy::too_many_lines)]
pub(super) fn section(goal: GoalId) -> SectionSchema {
    let n = goal.number();
    let field = |suffix: &str| format!("sdg{n}_{suffix}");
    let mut fields = match n {
        1 => vec![
            FieldDescriptor::single_choice(
                field("cost_reduction"),
                "How far does the project reduce running costs for occupants?",
                options(&[
                    ("none", "No measurable reduction"),
                    ("cost_reduc_2", "Costs reduced by up to 20%"),
                    ("cost_reduc_3", "Costs reduced by 20 to 40%"),
                    ("cost_reduc_4", "Costs reduced by more than 40%"),
                    ("self_sufficient", "Energy self-sufficient"),
                    ("energy_producing", "Net energy producing"),
                ]),
            ),
            FieldDescriptor::free_text(field("baseline_cost"), "Baseline versus projected cost"),
        ],
        2 => vec![FieldDescriptor::single_choice(
            field("food_integration"),
            "How is food production integrated into the project?",
            options(&[
                ("none", "Not considered"),
                ("study", "Feasibility study carried out"),
                ("conversion", "Space reserved for later conversion"),
                ("community", "Community garden"),
                ("private", "Private growing spaces for every unit"),
                ("production", "Productive urban farm"),
            ]),
        )],
        3 => vec![
            FieldDescriptor::multi_choice(
                field("actions"),
                "Health measures implemented",
                options(&[
                    ("materials", "Low-emission materials"),
                    ("air_quality", "Indoor air quality monitoring"),
                    ("water_quality", "Drinking water treatment"),
                    ("lighting_quality", "Daylight and lighting quality"),
                    ("acoustic_comfort", "Acoustic comfort"),
                    ("soil_cleaning", "Soil decontamination"),
                    ("thermal_comfort", "Summer thermal comfort"),
                    ("active_design", "Active design (stairs, cycling)"),
                ]),
            ),
            FieldDescriptor::single_choice(
                field("health_summary"),
                "How many health aspects does the project address?",
                counted(5, "aspect"),
            ),
        ],
        4 => vec![FieldDescriptor::single_choice(
            field("accessibility_summary"),
            "How does the project support access to education?",
            options(&[
                ("0", "Not addressed"),
                ("study", "Needs assessed"),
                ("1", "One educational facility nearby or on site"),
                ("2", "Two measures in place"),
                ("3", "Three measures in place"),
                ("4", "Dedicated educational programme"),
            ]),
        )],
        5 => vec![
            FieldDescriptor::multi_choice(
                field("actions"),
                "Equality measures implemented",
                options(&[
                    ("equal_pay", "Equal pay audit"),
                    ("safe_spaces", "Safe, well-lit public spaces"),
                    ("childcare", "Childcare facilities"),
                    ("mixed_teams", "Gender-balanced project team"),
                    ("consultation", "Consultation of women users"),
                    ("sanitary", "Adequate sanitary facilities"),
                    ("training", "Awareness training"),
                ]),
            ),
            FieldDescriptor::single_choice(
                field("equality_summary"),
                "How many equality aspects does the project address?",
                counted(5, "aspect"),
            ),
        ],
        6 => vec![FieldDescriptor::single_choice(
            field("water_summary"),
            "How many water-saving measures are in place?",
            {
                let mut scale = counted(5, "measure");
                scale.push(FieldOption::new("exceptional", "Exceptional water stewardship"));
                scale
            },
        )],
        7 => vec![FieldDescriptor::single_choice(
            field("renewable_impact"),
            "What is the energy impact of the project?",
            options(&[
                ("none", "No reduction"),
                ("reduc_25", "Consumption reduced by 25%"),
                ("reduc_50", "Consumption reduced by 50%"),
                ("reduc_75", "Consumption reduced by 75%"),
                ("neutral", "Energy neutral"),
                ("positive", "Energy positive"),
            ]),
        )],
        8 => vec![
            FieldDescriptor::single_choice(
                field("social_summary"),
                "Social conditions on site",
                counted(5, "requirement"),
            ),
            FieldDescriptor::single_choice(
                field("technical_summary"),
                "Technical and economic conditions",
                counted(5, "requirement"),
            ),
        ],
        9 => vec![
            checks(
                goal,
                &[
                    ("innovate_process", "Innovative construction process"),
                    ("renovation", "Renovation rather than new build"),
                    ("prefabrication", "Off-site prefabrication"),
                    ("digital_twin", "Digital model maintained for operation"),
                    ("local_industry", "Local industrial partners"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("innovation_summary"),
                "How many innovation requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        10 => vec![
            checks(
                goal,
                &[
                    ("social_housing", "Social housing share"),
                    ("accessibility", "Universal accessibility"),
                    ("mixed_use", "Mixed-use programme"),
                    ("affordable_rent", "Capped rents"),
                    ("local_hiring", "Local hiring clauses"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("inclusion_summary"),
                "How many inclusion requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        11 => vec![
            checks(
                goal,
                &[
                    ("public_transport", "Public transport within 500 m"),
                    ("cycling", "Secure cycle parking"),
                    ("green_space", "Shared green space"),
                    ("heritage", "Heritage preserved"),
                    ("resilience", "Climate resilience plan"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("measures"),
                "How many sustainable-city measures are in place?",
                measures_scale(),
            ),
        ],
        12 => vec![
            checks(
                goal,
                &[
                    ("reuse", "Reused materials"),
                    ("recycled", "Recycled content"),
                    ("biobased", "Bio-based materials"),
                    ("waste_plan", "Site waste management plan"),
                    ("disassembly", "Design for disassembly"),
                    ("local_sourcing", "Local sourcing"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("consumption_summary"),
                "How many responsible-consumption requirements are met?",
                counted(6, "requirement"),
            ),
        ],
        13 => vec![
            FieldDescriptor::single_choice(
                field("actions_summary"),
                "How many climate actions are implemented?",
                counted(5, "action"),
            ),
            FieldDescriptor::single_choice(
                field("carbon_reduction"),
                "Expected carbon reduction",
                options(&[
                    ("none", "None"),
                    ("minimal", "Minimal"),
                    ("moderate", "Moderate"),
                    ("significant", "Significant"),
                    ("major", "Major"),
                    ("negative", "Carbon negative"),
                ]),
            ),
        ],
        14 => vec![
            checks(
                goal,
                &[
                    ("runoff", "Runoff filtration"),
                    ("no_plastics", "No single-use plastics on site"),
                    ("wastewater", "Wastewater treatment"),
                    ("permeable", "Permeable surfaces"),
                    ("monitoring", "Water quality monitoring"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("pollution_summary"),
                "How many pollution-prevention measures are in place?",
                counted(5, "measure"),
            ),
        ],
        15 => vec![
            FieldDescriptor::single_choice(
                field("ecosystem_summary"),
                "How many biodiversity measures are in place?",
                counted(5, "measure"),
            ),
            artificialisation_scale(field("artificialisation_ratio")),
        ],
        16 => vec![
            checks(
                goal,
                &[
                    ("transparency", "Transparent procurement"),
                    ("participation", "Resident participation"),
                    ("anti_corruption", "Anti-corruption policy"),
                    ("grievance", "Grievance mechanism"),
                    ("safety", "Crime prevention through design"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("peace_summary"),
                "How many governance requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        17 => vec![
            checks(
                goal,
                &[
                    ("public_private", "Public-private partnership"),
                    ("ngo", "NGO involvement"),
                    ("academic", "Academic partner"),
                    ("knowledge_sharing", "Open knowledge sharing"),
                    ("international", "International cooperation"),
                    ("local_authority", "Local authority agreement"),
                ],
            ),
            FieldDescriptor::single_choice(
                field("partnership_summary"),
                "How many partnership requirements are met?",
                counted(6, "requirement"),
            ),
        ],
        18 | 22 | 27 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("innovation_summary"),
                "How many requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        19 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("inclusion_summary"),
                "How many requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        20 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("measures"),
                "How many measures are in place?",
                measures_scale(),
            ),
        ],
        21 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("consumption_summary"),
                "How many requirements are met?",
                counted(6, "requirement"),
            ),
        ],
        23 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("pollution_summary"),
                "How many requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        24 => vec![
            FieldDescriptor::single_choice(
                field("ecosystem_summary"),
                "How many requirements are met?",
                counted(5, "requirement"),
            ),
            artificialisation_scale(field("artificialisation_ratio")),
        ],
        25 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("peace_summary"),
                "How many requirements are met?",
                counted(5, "requirement"),
            ),
        ],
        26 => vec![
            checks(goal, &generic_checks()),
            FieldDescriptor::single_choice(
                field("partnership_summary"),
                "How many requirements are met?",
                counted(6, "requirement"),
            ),
        ],
        _ => Vec::new(),
    };

    fields.push(notes(goal));
    SectionSchema::new(goal, prompt(n), fields)
}

fn generic_checks() -> [(&'static str, &'static str); 6] {
    [
        ("documented", "Approach documented"),
        ("measured", "Outcomes measured"),
        ("budgeted", "Dedicated budget"),
        ("owner", "Named owner"),
        ("reviewed", "Reviewed yearly"),
        ("published", "Results published"),
    ]
}

fn prompt(n: u32) -> &'static str {
    match n {
        1 => "Describe how the project lowers living costs and supports vulnerable households.",
        2 => "Describe how the project contributes to local food security.",
        3 => "Describe the health and well-being measures built into the project.",
        4 => "Describe how the project improves access to education and training.",
        5 => "Describe the measures that promote gender equality.",
        6 => "Describe water management and sanitation on site.",
        7 => "Describe energy efficiency and renewable supply.",
        8 => "Describe working conditions and local economic benefits.",
        9 => "Describe innovation in design, construction and infrastructure.",
        10 => "Describe measures that reduce inequalities and improve inclusion.",
        11 => "Describe how the project fits a sustainable, resilient neighbourhood.",
        12 => "Describe material choices and waste management.",
        13 => "Describe mitigation and adaptation measures for climate change.",
        14 => "Describe how the project protects aquatic ecosystems.",
        15 => "Describe biodiversity measures and land take.",
        16 => "Describe governance, transparency and participation.",
        17 => "Describe the partnerships that support the project.",
        _ => "Experimental goal. Describe the measures taken.",
    }
}
