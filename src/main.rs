use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_gate::application::payment_service::PaymentService;
use payment_gate::domain::ports::{AccountStore, AccountStoreBox, StoreModeProviderBox};
use payment_gate::infrastructure::in_memory::InMemoryAccountStore;
#[cfg(feature = "storage-rocksdb")]
use payment_gate::infrastructure::rocksdb::RocksDBStore;
use payment_gate::infrastructure::store_mode::{EnvStoreModeProvider, FixedStoreMode};
use payment_gate::interfaces::csv::account_reader::AccountReader;
use payment_gate::interfaces::csv::decision_writer::DecisionWriter;
use payment_gate::interfaces::csv::payment_reader::PaymentReader;
use payment_gate::logging::init_logging;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment requests CSV file
    payments: PathBuf,

    /// Accounts CSV loaded into the primary store before processing.
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Accounts CSV loaded into the backup store before processing.
    #[arg(long)]
    backup_accounts: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, the primary store uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Fixed store mode. "Backup" routes every payment to the backup store.
    /// When omitted, DATA_STORE_TYPE is read before each payment.
    #[arg(long)]
    store_mode: Option<String>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn open_primary_store(db_path: Option<PathBuf>) -> Result<AccountStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            info!(path = %path.display(), "Using RocksDB primary store");
            Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryAccountStore::new()))
        }
        None => Ok(Box::new(InMemoryAccountStore::new())),
    }
}

async fn seed_accounts(store: &dyn AccountStore, path: &Path) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    let mut loaded = 0usize;
    for account in AccountReader::new(file).accounts() {
        match account {
            Ok(account) => {
                store.store(account).await.into_diagnostic()?;
                loaded += 1;
            }
            Err(e) => error!("Error reading account: {}", e),
        }
    }
    info!(path = %path.display(), loaded, "Seeded accounts");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let primary = open_primary_store(cli.db_path)?;
    let backup: AccountStoreBox = Box::new(InMemoryAccountStore::new());

    if let Some(path) = &cli.accounts {
        seed_accounts(primary.as_ref(), path).await?;
    }
    if let Some(path) = &cli.backup_accounts {
        seed_accounts(backup.as_ref(), path).await?;
    }

    let store_mode: StoreModeProviderBox = match cli.store_mode {
        Some(mode) => Box::new(FixedStoreMode::new(mode)),
        None => Box::new(EnvStoreModeProvider::default()),
    };

    let service = PaymentService::new(primary, backup, store_mode);

    let file = File::open(cli.payments).into_diagnostic()?;
    let reader = PaymentReader::new(file);
    let stdout = io::stdout();
    let mut writer = DecisionWriter::new(stdout.lock());

    let (mut approved, mut rejected) = (0usize, 0usize);
    for payment in reader.payments() {
        match payment {
            Ok(request) => match service.make_payment(&request).await {
                Ok(decision) => {
                    if decision.approved {
                        approved += 1;
                    } else {
                        rejected += 1;
                    }
                    writer.write_decision(&request, &decision).into_diagnostic()?;
                }
                Err(e) => error!("Error processing payment: {}", e),
            },
            Err(e) => error!("Error reading payment: {}", e),
        }
    }
    writer.flush().into_diagnostic()?;

    info!(approved, rejected, "Finished processing payments");
    Ok(())
}
