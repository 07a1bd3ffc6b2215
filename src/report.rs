use crate::sampler::StreamStats;

pub fn print_summary(stats: &[StreamStats]) {
    println!("\n{:=^78}", " TRACE SUMMARY ");
    println!("Streams: {}", stats.len());
    println!("{:-^78}", "");

    println!(
        "{:>6} | {:>14} | {:>8} | {:>8} | {:>12} | {:>7} | {}",
        "Stream", "Instructions", "Batches", "Sampled", "Records", "Windows", "Output"
    );
    println!("{:-^78}", "");

    for stat in stats {
        let output = stat
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>6} | {:>14} | {:>8} | {:>8} | {:>12} | {:>7} | {}",
            stat.stream,
            stat.instructions,
            stat.batches,
            stat.sampled_batches,
            stat.records_written,
            stat.windows_opened,
            output
        );
    }
    println!("{:=^78}\n", "");
}
