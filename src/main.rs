// Registration job: register.txt (+ proxy.txt) → accounts.txt

use std::time::Duration;

use referral_batch::{
    init_logging, load_lines, AccountStore, HttpProxyChecker, HttpRegistrationClient,
    PresetCaptcha, Registrar, Settings,
};

#[tokio::main]
async fn main() {
    init_logging();

    println!("📝 Referral Batch - Registration v{}", referral_batch::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let settings = Settings::load_or_default();
    run(settings).await;

    // Grace period for the log writer before the explicit exit.
    tokio::time::sleep(Duration::from_secs(1)).await;
    std::process::exit(0);
}

async fn run(settings: Settings) {
    let timeout = Duration::from_secs(settings.request_timeout_secs);
    let entries = load_lines(&settings.register_file);
    let proxies = load_lines(&settings.proxy_file);

    println!("\n📂 {} accounts, {} proxies", entries.len(), proxies.len());

    let registrar = Registrar::new(
        settings.clone(),
        PresetCaptcha::new(settings.captcha_token.clone()),
        HttpProxyChecker::new(settings.ip_check_url.clone(), timeout),
        HttpRegistrationClient::new(settings.register_url.clone(), timeout),
        AccountStore::new(settings.accounts_file.clone()),
    );

    let report = registrar.run(&entries, &proxies).await;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Registered:          {}", report.registered);
    println!("✓ Not stored:          {}", report.not_stored);
    println!("✓ Already existed:     {}", report.already_exists);
    println!("✓ Rejected:            {}", report.rejected);
    println!("✓ Failed:              {}", report.failed);
    println!("✓ CAPTCHA unavailable: {}", report.captcha_unavailable);
    println!("✓ Malformed lines:     {}", report.malformed);
    if let Some(finished) = report.finished_at {
        println!(
            "⏱️  {} accounts in {}s",
            report.total,
            (finished - report.started_at).num_seconds()
        );
    }
}
