//! emarket CLI - shop, cart and back office from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in .emarket-session.json in the working
//! # directory, or wherever EMARKET_SESSION_FILE points)
//! emarket auth login -e customer@example.com
//!
//! # Browse and fill the cart
//! emarket products list --category "Áo thun" --order price-asc
//! emarket cart add 12 -q 2
//!
//! # Place the order (cash on delivery)
//! emarket cart place-order --address "12 Lê Lợi, Q1, TP.HCM"
//!
//! # Back office
//! emarket orders board --status pending
//! emarket orders cancel 41 --reason "out of stock" --yes
//! ```
//!
//! # Commands
//!
//! - `auth` - Login, registration and logout
//! - `products`, `categories` - Catalog browsing and staff edits
//! - `cart` - Cart contents and checkout
//! - `orders` - Order history and the order desk
//! - `profile`, `wishlist` - Account pages
//! - `admin` - Admin-only management
//! - `stats` - Dashboards
//!
//! The API base URL comes from `EMARKET_API_URL`; `RUST_LOG` controls the
//! diagnostics written to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use emarket_client::listing::{
    ActiveFilter, OrderListFilter, OrderSearchScope, StockFilter, UserFilter,
};
use emarket_client::types::{
    CategoryDraft, CategoryPatch, NewUser, OrderFilter, PasswordChange, ProductDraft,
    ProductPatch, ProductQuery, RevenuePeriod, UserPatch, UserUpdate,
};
use emarket_core::{
    CartItemId, CategoryId, Email, OrderId, OrderStatus, PaymentMethod, Price, ProductId, UserId,
    UserRole,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod session_file;

use commands::Context;

#[derive(Parser)]
#[command(name = "emarket")]
#[command(author, version, about = "emarket shop client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, register, sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse and edit products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// The signed-in user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order history and the order desk
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// The signed-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// The signed-in user's wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Admin-only management
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Dashboards
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in and remember the token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "EMARKET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a customer account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "EMARKET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the token
    Logout,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Subcommand)]
enum ProductAction {
    /// Paginated listing
    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Server-side sort key
        #[arg(long)]
        sort: Option<String>,

        /// Stock narrowing (`all`, `low`, `out`)
        #[arg(long, default_value = "all", value_parser = parse_stock)]
        stock: StockFilter,

        /// Client-side order (`newest`, `price-asc`, `price-desc`, `name`, `rating`)
        #[arg(long)]
        order: Option<emarket_client::listing::ProductSort>,
    },
    /// One product
    Show { id: ProductId },
    /// Up to four products from the same category
    Related { id: ProductId },
    /// Free-text search
    Search { query: String },
    /// Products in a category, by name
    ByCategory { category: String },
    /// Category names used by the catalog
    CategoriesInUse,
    /// Create a product (staff)
    Create(DraftArgs),
    /// Update a product (staff)
    Update {
        id: ProductId,

        #[command(flatten)]
        patch: PatchArgs,
    },
    /// Delete a product (staff)
    Delete { id: ProductId },
    /// Set the stock level (staff)
    SetStock { id: ProductId, stock: u32 },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// All categories
    List,
    /// One category
    Show { id: CategoryId },
}

#[derive(Args)]
struct DraftArgs {
    #[arg(short, long)]
    name: String,

    #[arg(short, long, value_parser = parse_price)]
    price: Price,

    #[arg(short, long, default_value_t = 0)]
    stock: u32,

    #[arg(short, long)]
    description: Option<String>,

    #[arg(short, long)]
    category: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    image: Option<String>,

    /// Gallery image URL (repeatable)
    #[arg(long = "gallery")]
    images: Vec<String>,

    #[arg(long)]
    sku: Option<String>,

    /// Specification as `key=value` (repeatable)
    #[arg(long = "spec", value_parser = parse_key_value)]
    specifications: Vec<(String, String)>,
}

impl DraftArgs {
    fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            brand: self.brand,
            image: self.image,
            images: self.images,
            sku: self.sku,
            specifications: self.specifications.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

#[derive(Args)]
struct PatchArgs {
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long, value_parser = parse_price)]
    price: Option<Price>,

    #[arg(short, long)]
    stock: Option<u32>,

    #[arg(short, long)]
    description: Option<String>,

    #[arg(short, long)]
    category: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    image: Option<String>,

    /// Replace the gallery (repeatable)
    #[arg(long = "gallery")]
    images: Option<Vec<String>>,

    #[arg(long)]
    sku: Option<String>,
}

impl PatchArgs {
    fn into_patch(self) -> ProductPatch {
        ProductPatch {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            brand: self.brand,
            image: self.image,
            images: self.images,
            sku: self.sku,
        }
    }
}

// =============================================================================
// Cart and orders
// =============================================================================

#[derive(Subcommand)]
enum CartAction {
    /// Cart rows and total
    Show,
    /// Add a product (merges with an existing row)
    Add {
        product_id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove one row
    Remove { row: CartItemId },
    /// Set a row's quantity
    Update { row: CartItemId, quantity: u32 },
    /// Empty the cart after an order
    Checkout,
    /// Submit the cart as an order, then empty it
    PlaceOrder {
        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "cod")]
        payment: PaymentMethod,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// The signed-in user's orders
    Mine,
    /// One order
    Show { id: OrderId },
    /// Staff order desk with server-side filters
    Desk {
        #[arg(long)]
        status: Option<OrderStatus>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },
    /// Order status table with per-status counts
    Board {
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Order number, or shipping address
        #[arg(short, long, default_value = "")]
        search: String,

        /// Search order number or customer id instead
        #[arg(long)]
        by_customer: bool,
    },
    /// Move an order one step along the workflow
    Advance { id: OrderId },
    /// Cancel an order
    Cancel {
        id: OrderId,

        #[arg(short, long)]
        reason: Option<String>,

        /// Confirm the cancellation
        #[arg(long)]
        yes: bool,
    },
    /// Refund an order
    Refund {
        id: OrderId,

        #[arg(short, long, value_parser = parse_price)]
        amount: Option<Price>,

        /// Confirm the refund
        #[arg(long)]
        yes: bool,
    },
    /// Attach a note (staff)
    Note { id: OrderId, text: String },
}

// =============================================================================
// Account
// =============================================================================

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the profile
    Show,
    /// Update name and/or phone
    Update {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Change the password
    Password {
        #[arg(long, env = "EMARKET_PASSWORD", hide_env_values = true)]
        current: String,

        #[arg(long, env = "EMARKET_NEW_PASSWORD", hide_env_values = true)]
        new: String,

        #[arg(long, env = "EMARKET_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Products on the wishlist
    Show,
    /// Add if missing, remove if present
    Toggle { product_id: ProductId },
    /// Remove a product
    Remove { product_id: ProductId },
    /// Whether a product is on the wishlist
    Check { product_id: ProductId },
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Subcommand)]
enum AdminAction {
    /// Product management
    Products {
        #[command(subcommand)]
        action: AdminProductAction,
    },
    /// Category management
    Categories {
        #[command(subcommand)]
        action: AdminCategoryAction,
    },
    /// Order management
    Orders {
        #[command(subcommand)]
        action: AdminOrderAction,
    },
    /// User management
    Users {
        #[command(subcommand)]
        action: AdminUserAction,
    },
}

#[derive(Subcommand)]
enum AdminProductAction {
    Create(DraftArgs),
    Update {
        id: ProductId,

        #[command(flatten)]
        patch: PatchArgs,
    },
    Delete {
        id: ProductId,
    },
    /// Upload an image and print its URL
    UploadImage {
        path: PathBuf,
    },
    SetStock {
        id: ProductId,
        stock: u32,
    },
    Stats,
}

#[derive(Subcommand)]
enum AdminCategoryAction {
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },
    Update {
        id: CategoryId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },
    Delete {
        id: CategoryId,
    },
}

#[derive(Subcommand)]
enum AdminOrderAction {
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        status: Option<OrderStatus>,
    },
    Status {
        id: OrderId,
        status: OrderStatus,

        #[arg(short, long)]
        note: Option<String>,
    },
    Stats,
}

#[derive(Subcommand)]
enum AdminUserAction {
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short, long)]
        role: Option<UserRole>,

        /// `all`, `active` or `inactive`
        #[arg(long, default_value = "all", value_parser = parse_active)]
        status: ActiveFilter,
    },
    /// Create a staff or customer account with a temporary password
    Create {
        #[arg(short, long)]
        email: Email,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short, long, default_value = "staff")]
        role: UserRole,
    },
    Update {
        id: UserId,

        #[arg(short, long)]
        email: Option<Email>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short, long)]
        role: Option<UserRole>,
    },
    Delete {
        id: UserId,
    },
    Role {
        id: UserId,
        role: UserRole,
    },
    Activate {
        id: UserId,
    },
    Deactivate {
        id: UserId,
    },
}

// =============================================================================
// Stats
// =============================================================================

#[derive(Subcommand)]
enum StatsAction {
    /// Admin dashboard counters
    Dashboard,
    /// Revenue series
    Revenue {
        #[arg(long, default_value = "daily")]
        period: RevenuePeriod,

        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Best sellers
    Top {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Orders per status
    ByStatus,
    /// Staff dashboard summary
    Staff,
    /// Recent activity feed
    Activities {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

// =============================================================================
// Argument parsers
// =============================================================================

fn parse_price(s: &str) -> Result<Price, rust_decimal::Error> {
    s.trim().parse::<Decimal>().map(Price::new)
}

fn parse_stock(s: &str) -> Result<StockFilter, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(StockFilter::All),
        "low" | "low-stock" => Ok(StockFilter::LowStock),
        "out" | "out-of-stock" => Ok(StockFilter::OutOfStock),
        other => Err(format!("unknown stock filter: {other}")),
    }
}

fn parse_active(s: &str) -> Result<ActiveFilter, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(ActiveFilter::All),
        "active" => Ok(ActiveFilter::Active),
        "inactive" => Ok(ActiveFilter::Inactive),
        other => Err(format!("unknown status filter: {other}")),
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got {s}"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&ctx, &email, password).await?;
            }
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&ctx, name, &email, password).await?,
            AuthAction::Logout => commands::auth::logout(&ctx).await?,
        },
        Commands::Products { action } => run_products(&ctx, action).await?,
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::catalog::categories(&ctx).await?,
            CategoryAction::Show { id } => commands::catalog::category(&ctx, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&ctx, product_id, quantity).await?,
            CartAction::Remove { row } => commands::cart::remove(&ctx, row).await?,
            CartAction::Update { row, quantity } => {
                commands::cart::update(&ctx, row, quantity).await?;
            }
            CartAction::Checkout => commands::cart::checkout(&ctx).await?,
            CartAction::PlaceOrder { address, payment } => {
                commands::cart::place_order(&ctx, address, payment).await?;
            }
        },
        Commands::Orders { action } => run_orders(&ctx, action).await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::account::show_profile(&ctx).await?,
            ProfileAction::Update { name, phone } => {
                let update = UserUpdate {
                    full_name: name,
                    phone,
                };
                commands::account::update_profile(&ctx, &update).await?;
            }
            ProfileAction::Password {
                current,
                new,
                confirm,
            } => {
                let change = PasswordChange {
                    current,
                    new,
                    confirm,
                };
                commands::account::change_password(&ctx, change).await?;
            }
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::account::show_wishlist(&ctx).await?,
            WishlistAction::Toggle { product_id } => {
                commands::account::toggle_wishlist(&ctx, product_id).await?;
            }
            WishlistAction::Remove { product_id } => {
                commands::account::remove_from_wishlist(&ctx, product_id).await?;
            }
            WishlistAction::Check { product_id } => {
                commands::account::check_wishlist(&ctx, product_id).await?;
            }
        },
        Commands::Admin { action } => run_admin(&ctx, action).await?,
        Commands::Stats { action } => match action {
            StatsAction::Dashboard => commands::stats::dashboard(&ctx).await?,
            StatsAction::Revenue { period, days } => {
                commands::stats::revenue(&ctx, period, days).await?;
            }
            StatsAction::Top { limit } => commands::stats::top_products(&ctx, limit).await?,
            StatsAction::ByStatus => commands::stats::by_status(&ctx).await?,
            StatsAction::Staff => commands::stats::staff(&ctx).await?,
            StatsAction::Activities { limit } => {
                commands::stats::activities(&ctx, limit).await?;
            }
        },
    }
    Ok(())
}

async fn run_products(ctx: &Context, action: ProductAction) -> Result<(), commands::CommandError> {
    use commands::catalog;

    match action {
        ProductAction::List {
            page,
            limit,
            search,
            category,
            sort,
            stock,
            order,
        } => {
            let query = ProductQuery {
                page,
                limit,
                search,
                category,
                sort,
            };
            let narrowing = catalog::Narrowing { stock, sort: order };
            catalog::list(ctx, &query, &narrowing).await
        }
        ProductAction::Show { id } => catalog::show(ctx, id).await,
        ProductAction::Related { id } => catalog::related(ctx, id).await,
        ProductAction::Search { query } => catalog::search(ctx, &query).await,
        ProductAction::ByCategory { category } => catalog::by_category(ctx, &category).await,
        ProductAction::CategoriesInUse => catalog::category_names_in_use(ctx).await,
        ProductAction::Create(draft) => catalog::create(ctx, &draft.into_draft()).await,
        ProductAction::Update { id, patch } => catalog::update(ctx, id, &patch.into_patch()).await,
        ProductAction::Delete { id } => catalog::delete(ctx, id).await,
        ProductAction::SetStock { id, stock } => catalog::set_stock(ctx, id, stock).await,
    }
}

async fn run_orders(ctx: &Context, action: OrderAction) -> Result<(), commands::CommandError> {
    use commands::orders;

    match action {
        OrderAction::Mine => orders::mine(ctx).await,
        OrderAction::Show { id } => orders::show(ctx, id).await,
        OrderAction::Desk {
            status,
            from,
            to,
            search,
            page,
            limit,
        } => {
            let filter = OrderFilter {
                status,
                start_date: from,
                end_date: to,
                search,
                page,
                limit,
            };
            orders::desk(ctx, &filter).await
        }
        OrderAction::Board {
            status,
            search,
            by_customer,
        } => {
            let filter = OrderListFilter {
                search,
                status,
                scope: if by_customer {
                    OrderSearchScope::Staff
                } else {
                    OrderSearchScope::Admin
                },
            };
            orders::board(ctx, &filter).await
        }
        OrderAction::Advance { id } => orders::advance(ctx, id).await,
        OrderAction::Cancel { id, reason, yes } => {
            orders::destructive(ctx, orders::cancellation(id, reason), yes).await
        }
        OrderAction::Refund { id, amount, yes } => {
            orders::destructive(ctx, orders::refund(id, amount), yes).await
        }
        OrderAction::Note { id, text } => orders::note(ctx, id, &text).await,
    }
}

async fn run_admin(ctx: &Context, action: AdminAction) -> Result<(), commands::CommandError> {
    use commands::admin;

    match action {
        AdminAction::Products { action } => match action {
            AdminProductAction::Create(draft) => {
                admin::create_product(ctx, &draft.into_draft()).await
            }
            AdminProductAction::Update { id, patch } => {
                admin::update_product(ctx, id, &patch.into_patch()).await
            }
            AdminProductAction::Delete { id } => admin::delete_product(ctx, id).await,
            AdminProductAction::UploadImage { path } => admin::upload_image(ctx, &path).await,
            AdminProductAction::SetStock { id, stock } => admin::set_stock(ctx, id, stock).await,
            AdminProductAction::Stats => admin::product_stats(ctx).await,
        },
        AdminAction::Categories { action } => match action {
            AdminCategoryAction::Create {
                name,
                description,
                image,
            } => {
                let draft = CategoryDraft {
                    name,
                    description,
                    image,
                };
                admin::create_category(ctx, &draft).await
            }
            AdminCategoryAction::Update {
                id,
                name,
                description,
                image,
            } => {
                let patch = CategoryPatch {
                    name,
                    description,
                    image,
                };
                admin::update_category(ctx, id, &patch).await
            }
            AdminCategoryAction::Delete { id } => admin::delete_category(ctx, id).await,
        },
        AdminAction::Orders { action } => match action {
            AdminOrderAction::List {
                skip,
                limit,
                status,
            } => admin::list_orders(ctx, skip, limit, status).await,
            AdminOrderAction::Status { id, status, note } => {
                admin::update_order_status(ctx, id, status, note.as_deref()).await
            }
            AdminOrderAction::Stats => admin::order_stats(ctx).await,
        },
        AdminAction::Users { action } => match action {
            AdminUserAction::List {
                skip,
                limit,
                search,
                role,
                status,
            } => {
                let filter = UserFilter {
                    search,
                    role,
                    status,
                };
                admin::list_users(ctx, skip, limit, &filter).await
            }
            AdminUserAction::Create {
                email,
                name,
                phone,
                role,
            } => {
                let user = NewUser {
                    email,
                    full_name: name,
                    phone,
                    role,
                };
                admin::create_user(ctx, &user).await
            }
            AdminUserAction::Update {
                id,
                email,
                name,
                phone,
                role,
            } => {
                let patch = UserPatch {
                    email,
                    full_name: name,
                    phone,
                    role,
                };
                admin::update_user(ctx, id, &patch).await
            }
            AdminUserAction::Delete { id } => admin::delete_user(ctx, id).await,
            AdminUserAction::Role { id, role } => admin::set_role(ctx, id, role).await,
            AdminUserAction::Activate { id } => admin::set_active(ctx, id, true).await,
            AdminUserAction::Deactivate { id } => admin::set_active(ctx, id, false).await,
        },
    }
}
