//! Text rendering of a report for the terminal.

use steuer_core::{CalculationInput, ReportBreakdown};

use crate::utils::{format_currency, format_percent};

/// Renders the corporate and personal waterfall as a table of figures.
pub fn render_figures(breakdown: &ReportBreakdown) -> String {
    let r = &breakdown.report;
    let rows = [
        ("Gewinn vor Steuern", format_currency(r.corporate_profit_before_tax)),
        ("Gewerbesteuer", format_currency(breakdown.trade_tax)),
        ("Körperschaftsteuer", format_currency(breakdown.corporate_income_tax)),
        ("Solidaritätszuschlag", format_currency(breakdown.solidarity_surcharge)),
        ("Steuern GmbH", format_currency(r.corporate_tax_total)),
        ("Gewinn nach Steuern", format_currency(r.corporate_profit_after_tax)),
        ("Abgabenlast GmbH", format_percent(breakdown.corporate_burden_percent)),
        ("GF Brutto", format_currency(r.personal_gross_income)),
        ("Krankenkassenbeitrag", format_currency(r.health_insurance_contribution)),
        ("Absetzbarer KV-Beitrag", format_currency(breakdown.deductible_insurance)),
        ("Werbungskostenpauschale", format_currency(breakdown.standard_allowance)),
        ("ZvE", format_currency(r.taxable_income)),
        ("Einkommensteuer", format_currency(r.income_tax)),
        ("Durchschnittssteuersatz", format_percent(breakdown.average_tax_rate_percent)),
        ("Grenzsteuersatz", format_percent(r.marginal_tax_rate)),
        ("Persönliche Abgaben", format_currency(breakdown.personal_levies)),
        ("GF Netto", format_currency(r.personal_net_income)),
        ("Nettoerlös", format_currency(r.total_net_proceeds)),
        ("Abgaben gesamt", format_currency(r.total_levies)),
        ("Abgabenlast", format_percent(r.total_levies_percent)),
    ];

    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        let pad = width - label.chars().count();
        out.push_str(&format!("{label}{:pad$}  {value:>12}\n", ""));
    }
    out
}

/// Renders the narrative summary of a calculation.
///
/// The married paragraph is only included when `input.married` is set.
pub fn render_summary(
    input: &CalculationInput,
    breakdown: &ReportBreakdown,
) -> String {
    let r = &breakdown.report;
    let mut text = String::new();

    text.push_str(&format!(
        "Das Steuerjahr {} wurde für die Berechnung herangezogen. Die GmbH erwirtschaftete \
         einen Jahresumsatz von {}, wovon {} als Kosten und {} als Geschäftsführergehalt \
         abgezogen wurden.\n",
        r.tax_year,
        format_currency(input.revenue),
        format_currency(input.costs),
        format_currency(input.director_salary),
    ));
    text.push('\n');
    text.push_str(&format!(
        "Dadurch ergibt sich ein Gewinn vor Steuern von {}. Nach Abzug der Unternehmenssteuern \
         ({} für Körperschaftsteuer, Solidaritätszuschlag und Gewerbesteuer) bleibt ein Gewinn \
         nach Steuern von {} übrig.\n",
        format_currency(r.corporate_profit_before_tax),
        format_currency(r.corporate_tax_total),
        format_currency(r.corporate_profit_after_tax),
    ));
    text.push('\n');
    text.push_str(&format!(
        "Für den Geschäftsführer ergibt sich ein zu versteuerndes Einkommen von {}, wobei {} an \
         Krankenkassenbeiträgen, eine Werbungskostenpauschale von {} und {} als sonstige \
         absetzbare Ausgaben berücksichtigt wurden.\n",
        format_currency(r.taxable_income),
        format_currency(r.health_insurance_contribution),
        format_currency(breakdown.standard_allowance),
        format_currency(input.other_deductible_expenses),
    ));
    text.push('\n');
    text.push_str(&format!(
        "Der persönliche Einkommensteuersatz liegt bei {}, während der Grenzsteuersatz {} \
         beträgt. Insgesamt fallen persönliche Abgaben in Höhe von {} an, was einer \
         Abgabenlast von {} entspricht.\n",
        format_percent(breakdown.average_tax_rate_percent),
        format_percent(r.marginal_tax_rate),
        format_currency(breakdown.personal_levies),
        format_percent(breakdown.personal_burden_percent),
    ));

    if input.married {
        text.push('\n');
        text.push_str(&format!(
            "Da der Geschäftsführer verheiratet ist, wird auch das zu versteuernde Einkommen \
             des Ehepartners von {} berücksichtigt. Das gemeinsame zu versteuernde Einkommen \
             beträgt {} und wird nach dem Splittingtarif besteuert.\n",
            format_currency(input.spouse_taxable_income),
            format_currency(r.taxable_income),
        ));
    }

    text.push('\n');
    text.push_str(&format!(
        "Zusammengefasst ergibt sich ein Nettoerlös von {}, nachdem insgesamt {} an Steuern \
         und Abgaben gezahlt wurden. Die gesamte Abgabenlast beträgt damit {}.\n",
        format_currency(r.total_net_proceeds),
        format_currency(r.total_levies),
        format_percent(r.total_levies_percent),
    ));

    text
}
