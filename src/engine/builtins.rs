use std::collections::HashMap;
use std::fmt;

/// Signature shared by every built-in function: strings in, string out.
pub type BuiltinFn = Box<dyn Fn(&[String]) -> String + Send + Sync>;

/// Subtotal above which shipping is free.
const FREE_SHIPPING_THRESHOLD: f64 = 99.0;
/// Flat shipping fee below the free threshold.
const FLAT_SHIPPING_FEE: f64 = 12.0;

/// Registry of callable built-in functions.
///
/// Each entry simulates one business operation behind a pure
/// string-in/string-out surface. Results are derived from content digests so
/// repeated calls with the same arguments return the same value.
pub struct FunctionRegistry {
    functions: HashMap<String, BuiltinFn>,
}

impl FunctionRegistry {
    /// Create a registry with no functions registered.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Create a registry holding the standard simulated business functions.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("get_order_status", |args: &[String]| {
            get_order_status(arg(args, 0))
        });
        registry.register("create_refund", |args: &[String]| {
            create_refund(arg(args, 0), arg(args, 1))
        });
        registry.register("create_ticket", |args: &[String]| {
            create_ticket(arg(args, 0))
        });
        registry.register("get_coupon", |args: &[String]| get_coupon(arg(args, 0)));
        registry.register("get_recommendation", |args: &[String]| {
            get_recommendation(arg(args, 0))
        });
        registry.register("apply_discount", |args: &[String]| {
            apply_discount(arg(args, 0), arg(args, 1))
        });
        registry.register("shipping_fee", |args: &[String]| shipping_fee(arg(args, 0)));
        registry
    }

    /// Register (or replace) a function under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&[String]) -> String + Send + Sync + 'static,
    ) {
        self.functions.insert(name.into(), Box::new(function));
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Invoke `name` with the given arguments; `None` when unregistered.
    pub fn call(&self, name: &str, args: &[String]) -> Option<String> {
        self.functions.get(name).map(|function| function(args))
    }

    /// Render the placeholder string for a call that resolved to nothing:
    /// `name(arg, arg, ...)`.
    pub fn synthesize(name: &str, args: &[String]) -> String {
        format!("{}({})", name, args.join(", "))
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

/// Missing arguments degrade to the empty string rather than failing.
fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or("")
}

/// Stable 64-bit digest of a string, for table selection and ID synthesis.
fn digest64(input: &str) -> u64 {
    let bytes = blake3::hash(input.as_bytes());
    let b = bytes.as_bytes();
    u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

fn get_order_status(order_number: &str) -> String {
    const STATUSES: &[&str] = &["processing", "packed", "shipped", "in transit", "delivered"];
    let index = (digest64(order_number) % STATUSES.len() as u64) as usize;
    STATUSES[index].to_string()
}

fn create_refund(order_number: &str, reason: &str) -> String {
    // REF + trailing order digits + reason length, e.g. REF88125.
    let tail: String = order_number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("REF{}{}", tail, reason.chars().count())
}

fn create_ticket(description: &str) -> String {
    format!("TICKET{:04}", digest64(description) % 10_000)
}

fn get_coupon(category: &str) -> String {
    match category.trim().to_lowercase().as_str() {
        "electronics" => "SAVE10",
        "clothing" => "STYLE15",
        "books" => "READ5",
        "home" => "COZY8",
        _ => "WELCOME5",
    }
    .to_string()
}

fn get_recommendation(category: &str) -> String {
    match category.trim().to_lowercase().as_str() {
        "electronics" => "wireless earbuds",
        "clothing" => "the canvas weekender jacket",
        "books" => "this month's staff-picked novel",
        "home" => "a cast-iron dutch oven",
        _ => "our weekly bestsellers",
    }
    .to_string()
}

fn apply_discount(amount: &str, percent: &str) -> String {
    let (Ok(amount_value), Ok(percent_value)) =
        (amount.trim().parse::<f64>(), percent.trim().parse::<f64>())
    else {
        // Unparseable input degrades to the original amount.
        return amount.to_string();
    };
    format!("{:.2}", amount_value * (100.0 - percent_value) / 100.0)
}

fn shipping_fee(subtotal: &str) -> String {
    let fee = match subtotal.trim().parse::<f64>() {
        Ok(value) if value >= FREE_SHIPPING_THRESHOLD => 0.0,
        Ok(_) => FLAT_SHIPPING_FEE,
        Err(_) => FLAT_SHIPPING_FEE,
    };
    format!("{fee:.2}")
}
