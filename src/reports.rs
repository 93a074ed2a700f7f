use crate::runner::RunSummary;
use crate::types::DrawResult;
use crate::utils::format_numbers;

pub fn banner(url: &str) {
    println!("{}", "=".repeat(50));
    println!("🎲 Quina Results Fetcher");
    println!("{}", "=".repeat(50));
    println!("🔍 Fetching results from: {}", url);
}

pub fn fetched(bytes: usize) {
    println!("📥 Fetched {} bytes of HTML", bytes);
}

pub fn parsed(count: usize) {
    println!("🧾 Parsed {} results from page", count);
}

pub fn loaded(count: usize) {
    println!("📋 Loaded {} existing results", count);
}

pub fn added_line(added: &[u32]) -> String {
    if added.is_empty() {
        "⚠ No new draws found".to_string()
    } else {
        let draws = added.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
        format!("✓ New draws added: [{}]", draws)
    }
}

pub fn latest_lines(latest: &DrawResult) -> [String; 2] {
    [
        format!("  Draw #{} ({})", latest.draw_number(), latest.date()),
        format!("  Numbers: {}", format_numbers(latest.numbers())),
    ]
}

pub fn summary(summary: &RunSummary) {
    println!("{}", added_line(&summary.added_draws));
    if !summary.corrected_draws.is_empty() {
        println!("✏ Corrected draws: {:?}", summary.corrected_draws);
    }
    println!(
        "💾 Saved {} results to {}",
        summary.saved,
        summary.saved_to.display()
    );

    if let Some(latest) = &summary.latest {
        println!("\n🏆 Latest Result:");
        for line in latest_lines(latest) {
            println!("{}", line);
        }
    }

    println!("\n✅ Fetch completed successfully!");
}
