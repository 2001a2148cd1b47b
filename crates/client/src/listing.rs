//! Filtering, sorting and counting for the list pages.
//!
//! Everything here is pure and works on borrowed slices, so a caller can run
//! it over whatever a store currently holds.

use std::cmp::Ordering;
use std::collections::HashSet;

use emarket_core::{OrderStatus, UserRole};

use crate::types::{Order, Product, StockLevel, User};

// =============================================================================
// Products
// =============================================================================

/// Stock filter of the product tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockFilter {
    #[default]
    All,
    /// `0 < stock < 10`.
    LowStock,
    /// `stock == 0`.
    OutOfStock,
}

impl StockFilter {
    #[must_use]
    pub const fn matches(self, stock: u32) -> bool {
        match self {
            Self::All => true,
            Self::LowStock => matches!(StockLevel::of(stock), StockLevel::Low),
            Self::OutOfStock => stock == 0,
        }
    }
}

/// Product table filter. Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or description.
    pub search: String,
    /// Normalized category name.
    pub category: Option<String>,
    pub stock: StockFilter,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));

        let category_ok = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .is_none_or(|c| product.in_category(c));

        search_ok && category_ok && self.stock.matches(product.stock)
    }

    /// The matching products, in input order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct non-empty category names, in first-seen order.
#[must_use]
pub fn category_names(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter_map(Product::category_name)
        .filter(|name| seen.insert(*name))
        .map(str::to_owned)
        .collect()
}

/// Sort orders offered by the shop page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Most recently created first; undated products last.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// Case-insensitive by name.
    Name,
    /// Highest rated first; unrated counts as zero.
    Rating,
}

impl ProductSort {
    /// Sort in place. Stable, so ties keep their input order.
    pub fn sort(self, products: &mut [&Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Rating => b
                .rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0)),
        }
    }
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "price-asc" | "price_asc" => Ok(Self::PriceAsc),
            "price-desc" | "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            other => Err(format!("unknown sort: {other}")),
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// Active-status filter of the user table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

/// User table filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring of email or full name.
    pub search: String,
    pub role: Option<UserRole>,
    pub status: ActiveFilter,
}

impl UserFilter {
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || user.email.to_lowercase().contains(&needle)
            || user
                .full_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));

        let role_ok = self.role.is_none_or(|r| r == user.role);
        let status_ok = match self.status {
            ActiveFilter::All => true,
            ActiveFilter::Active => user.is_active,
            ActiveFilter::Inactive => !user.is_active,
        };

        search_ok && role_ok && status_ok
    }

    #[must_use]
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}

/// Header counters of the user table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCounts {
    pub total: usize,
    pub admins: usize,
    pub staff: usize,
    pub customers: usize,
    pub active: usize,
    pub inactive: usize,
}

impl UserCounts {
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(
            Self {
                total: users.len(),
                ..Self::default()
            },
            |mut counts, user| {
                match user.role {
                    UserRole::Admin => counts.admins += 1,
                    UserRole::Staff => counts.staff += 1,
                    UserRole::Customer => counts.customers += 1,
                }
                if user.is_active {
                    counts.active += 1;
                } else {
                    counts.inactive += 1;
                }
                counts
            },
        )
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Orders with `status`, or all of them for `None`.
#[must_use]
pub fn filter_orders(orders: &[Order], status: Option<OrderStatus>) -> Vec<&Order> {
    OrderListFilter {
        status,
        ..OrderListFilter::default()
    }
    .apply(orders)
}

/// Which fields the order table search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSearchScope {
    /// Order number or shipping address.
    #[default]
    Admin,
    /// Order number or customer id.
    Staff,
}

/// Order table filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderListFilter {
    /// Case-insensitive substring, see [`OrderSearchScope`].
    pub search: String,
    pub status: Option<OrderStatus>,
    pub scope: OrderSearchScope,
}

impl OrderListFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || order.order_number.to_lowercase().contains(&needle)
            || match self.scope {
                OrderSearchScope::Admin => order.shipping_address.to_lowercase().contains(&needle),
                OrderSearchScope::Staff => order.user_id.to_string().contains(&needle),
            };

        search_ok && self.status.is_none_or(|s| order.status == s)
    }

    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

/// Per-status order counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderCounts {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub shipping: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl OrderCounts {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut counts = Self {
            total: orders.len(),
            ..Self::default()
        };
        for order in orders {
            *counts.slot(order.status) += 1;
        }
        counts
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Confirmed => self.confirmed,
            OrderStatus::Shipping => self.shipping,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Cancelled => self.cancelled,
        }
    }

    const fn slot(&mut self, status: OrderStatus) -> &mut usize {
        match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Confirmed => &mut self.confirmed,
            OrderStatus::Shipping => &mut self.shipping,
            OrderStatus::Delivered => &mut self.delivered,
            OrderStatus::Cancelled => &mut self.cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::order::fixtures::order;
    use emarket_core::UserId;

    fn product(id: i32, name: &str, category: serde_json::Value, stock: u32, price: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "description": format!("{name} description"),
            "price": price,
            "stock": stock,
            "category": category,
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Linen Shirt", serde_json::json!("Shirts"), 25, 350_000.0),
            product(2, "Denim Jacket", serde_json::json!({"id": 2, "name": "Jackets"}), 4, 900_000.0),
            product(3, "Oxford Shirt", serde_json::json!({"id": 1, "name": "Shirts"}), 0, 420_000.0),
            product(4, "Canvas Tote", serde_json::Value::Null, 12, 150_000.0),
        ]
    }

    #[test]
    fn test_category_filter_uses_normalized_name() {
        let products = catalog();
        let filter = ProductFilter {
            category: Some("Shirts".to_string()),
            ..ProductFilter::default()
        };
        let ids: Vec<_> = filter.apply(&products).iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let products = catalog();
        let filter = ProductFilter {
            search: "SHIRT".to_string(),
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&products).len(), 2);

        let filter = ProductFilter {
            search: "tote desc".to_string(),
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&products).len(), 1);
    }

    #[test]
    fn test_stock_filters() {
        let products = catalog();
        let low = ProductFilter {
            stock: StockFilter::LowStock,
            ..ProductFilter::default()
        };
        let out = ProductFilter {
            stock: StockFilter::OutOfStock,
            ..ProductFilter::default()
        };
        assert_eq!(low.apply(&products)[0].id.as_i32(), 2);
        assert_eq!(out.apply(&products)[0].id.as_i32(), 3);
        assert_eq!(low.apply(&products).len(), 1);
    }

    #[test]
    fn test_category_names_distinct_in_first_seen_order() {
        assert_eq!(category_names(&catalog()), vec!["Shirts", "Jackets"]);
    }

    #[test]
    fn test_price_and_name_sorts() {
        let products = catalog();
        let mut view: Vec<&Product> = products.iter().collect();

        ProductSort::PriceAsc.sort(&mut view);
        assert_eq!(view[0].id.as_i32(), 4);

        ProductSort::PriceDesc.sort(&mut view);
        assert_eq!(view[0].id.as_i32(), 2);

        ProductSort::Name.sort(&mut view);
        let names: Vec<_> = view.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Canvas Tote", "Denim Jacket", "Linen Shirt", "Oxford Shirt"]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("price-desc".parse::<ProductSort>(), Ok(ProductSort::PriceDesc));
        assert!("cheapest".parse::<ProductSort>().is_err());
    }

    fn user(id: i32, email: &str, role: UserRole, active: bool) -> User {
        User {
            id: UserId::new(id),
            email: email.to_string(),
            full_name: Some(format!("User {id}")),
            phone: None,
            role,
            is_active: active,
        }
    }

    #[test]
    fn test_user_filter_and_counts() {
        let users = vec![
            user(1, "admin@shop.vn", UserRole::Admin, true),
            user(2, "staff@shop.vn", UserRole::Staff, true),
            user(3, "a@mail.vn", UserRole::Customer, false),
            user(4, "b@mail.vn", UserRole::Customer, true),
        ];

        let filter = UserFilter {
            role: Some(UserRole::Customer),
            status: ActiveFilter::Active,
            ..UserFilter::default()
        };
        assert_eq!(filter.apply(&users).len(), 1);

        let filter = UserFilter {
            search: "SHOP.VN".to_string(),
            ..UserFilter::default()
        };
        assert_eq!(filter.apply(&users).len(), 2);

        let counts = UserCounts::from_users(&users);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.customers, 2);
        assert_eq!(counts.inactive, 1);
    }

    #[test]
    fn test_filter_orders_and_pending_count() {
        let orders = vec![
            order(1, OrderStatus::Pending, 10),
            order(2, OrderStatus::Delivered, 20),
            order(3, OrderStatus::Pending, 30),
            order(4, OrderStatus::Cancelled, 40),
        ];

        let pending = filter_orders(&orders, Some(OrderStatus::Pending));
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|o| o.status == OrderStatus::Pending));
        assert_eq!(filter_orders(&orders, None).len(), 4);

        let counts = OrderCounts::from_orders(&orders);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.get(OrderStatus::Pending), 2);
        assert_eq!(counts.get(OrderStatus::Shipping), 0);
    }

    fn order_table() -> Vec<Order> {
        let mut second = order(2, OrderStatus::Delivered, 20);
        second.user_id = UserId::new(42);
        second.shipping_address = "9 Hai Ba Trung, Hanoi".to_string();
        vec![
            order(1, OrderStatus::Pending, 10),
            second,
            order(3, OrderStatus::Pending, 30),
        ]
    }

    #[test]
    fn test_order_search_by_admin_scope() {
        let orders = order_table();
        let ids = |filter: &OrderListFilter| -> Vec<i32> {
            filter.apply(&orders).iter().map(|o| o.id.as_i32()).collect()
        };

        let by_number = OrderListFilter {
            search: "ord-00003".to_string(),
            ..OrderListFilter::default()
        };
        assert_eq!(ids(&by_number), vec![3]);

        let by_address = OrderListFilter {
            search: "HANOI".to_string(),
            ..OrderListFilter::default()
        };
        assert_eq!(ids(&by_address), vec![2]);

        let by_customer = OrderListFilter {
            search: "42".to_string(),
            ..OrderListFilter::default()
        };
        assert!(ids(&by_customer).is_empty());

        let pending_on_le_loi = OrderListFilter {
            search: " le loi ".to_string(),
            status: Some(OrderStatus::Pending),
            ..OrderListFilter::default()
        };
        assert_eq!(ids(&pending_on_le_loi), vec![1, 3]);
    }

    #[test]
    fn test_order_search_by_staff_scope() {
        let orders = order_table();
        let staff = |search: &str, status| OrderListFilter {
            search: search.to_string(),
            status,
            scope: OrderSearchScope::Staff,
        };

        assert_eq!(staff("42", None).apply(&orders).len(), 1);
        assert_eq!(staff("Ord-0000", None).apply(&orders).len(), 3);
        assert!(staff("hanoi", None).apply(&orders).is_empty());
        assert!(staff("42", Some(OrderStatus::Pending)).apply(&orders).is_empty());
        assert_eq!(staff("", Some(OrderStatus::Pending)).apply(&orders).len(), 2);
    }
}
