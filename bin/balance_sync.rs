// Balance sync job: accounts.txt → dashboard → prune accounts over the threshold

use referral_batch::{
    init_logging, log, AccountStore, BalanceSync, Settings, Severity, SimulatedDashboard,
    SyncReport,
};

#[tokio::main]
async fn main() {
    init_logging();

    println!("📊 Referral Batch - Balance Sync v{}", referral_batch::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    log(Severity::Info, "Starting batch process...");

    // Run the batch on its own task so a panic is reported instead of skipping the completion log.
    match tokio::spawn(run()).await {
        Ok(report) => print_report(&report),
        Err(e) => log(Severity::Error, format!("An error occurred: {}", e)),
    }

    log(Severity::Info, "Batch process completed.");
}

async fn run() -> SyncReport {
    let settings = Settings::load_or_default();
    let store = AccountStore::new(settings.accounts_file.clone());
    let sync = BalanceSync::new(settings, SimulatedDashboard, store);
    sync.run().await
}

fn print_report(report: &SyncReport) {
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Accounts:        {}", report.total);
    println!("✓ Pruned:          {}", report.pruned);
    println!("✓ Below threshold: {}", report.below_threshold);
    println!("✓ Unavailable:     {}", report.unavailable);
}
