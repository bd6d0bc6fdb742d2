use clap::Args;
use invoicing_app::{
    database::{self, Db},
    invoices::{
        InvoicesService, PgInvoicesService,
        data::{NewInvoice, NewInvoiceItem},
    },
};
use jiff::{ToSpan, Zoned, civil::Date};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rust_decimal::Decimal;

const COMPANIES: [&str; 20] = [
    "Acme Corp",
    "Beta LLC",
    "Gamma Industries",
    "Delta Solutions",
    "Epsilon Tech",
    "Zeta Enterprises",
    "Eta Systems",
    "Theta Group",
    "Iota Holdings",
    "Kappa Ltd",
    "Lambda Inc",
    "Mu Corporation",
    "Nu Dynamics",
    "Xi Partners",
    "Omicron Co",
    "Pi Innovations",
    "Rho Ventures",
    "Sigma Networks",
    "Tau Technologies",
    "Upsilon Ltd",
];

/// Product name and unit price in cents.
const PRODUCTS: [(&str, i64); 10] = [
    ("Widget A", 5000),
    ("Widget B", 3000),
    ("Widget C", 2000),
    ("Gadget Pro", 7500),
    ("Tool Kit", 4500),
    ("Device X", 12000),
    ("Component Y", 2500),
    ("Module Z", 6500),
    ("Service Pack", 10000),
    ("Premium License", 20000),
];

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Number of demo invoices to create
    #[arg(long, default_value_t = 50)]
    count: u32,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgInvoicesService::new(Db::new(pool));
    let today = Zoned::now().date();
    let mut rng = StdRng::from_entropy();

    for i in 1..=args.count {
        let invoice = demo_invoice(i, today, &mut rng)?;
        let number = invoice.number.clone();

        service
            .create_invoice(invoice)
            .await
            .map_err(|error| format!("failed to create invoice {number}: {error}"))?;
    }

    println!("seeded {} invoices", args.count);

    Ok(())
}

fn demo_invoice(i: u32, today: Date, rng: &mut StdRng) -> Result<NewInvoice, String> {
    let date = today
        .checked_sub(rng.gen_range(1..=90_i64).days())
        .map_err(|error| format!("invalid seed date: {error}"))?;

    let customer_name = COMPANIES.choose(rng).copied().unwrap_or("Acme Corp");

    let item_count = rng.gen_range(1..=5);
    let mut items = Vec::with_capacity(item_count);

    for _ in 0..item_count {
        if let Some(&(product_name, cents)) = PRODUCTS.choose(rng) {
            items.push(NewInvoiceItem {
                product_name: product_name.to_string(),
                unit_price: Decimal::new(cents, 2),
                quantity: rng.gen_range(1..=10),
            });
        }
    }

    Ok(NewInvoice {
        number: format!("INV-{i:03}"),
        date,
        reference: Some(format!("PO-{}", 1000 + i)),
        customer_name: customer_name.to_string(),
        items,
    })
}
