use migration::Migrator;
use sea_orm_migration::cli;

/// `DATABASE_URL=... migration up|down|fresh|status`
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
