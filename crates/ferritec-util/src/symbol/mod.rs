//! Symbol module - String interning for efficient identifier handling.
//!
//! This module provides the [`Symbol`] type, which is a compact (4-byte) handle
//! to an interned string. Symbols enable O(1) string comparison and reduce memory
//! usage when the same string appears multiple times in the compiler.
//!
//! # Overview
//!
//! The symbol interning system is a core component of the Fax compiler, providing:
//!
//! - **Memory efficiency**: Each unique string is stored only once
//! - **Fast comparison**: Symbol comparison is O(1) via index comparison
//! - **Thread safety**: Safe to use across multiple threads concurrently
//! - **Stable handles**: Symbols remain valid for the program lifetime
//!
//! # Performance Characteristics
//!
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `Symbol::intern()` (hit) | O(1) | String already interned |
//! | `Symbol::intern()` (miss) | O(1) | New string allocation |
//! | `Symbol` comparison | O(1) | Index comparison only |
//! | `Symbol::as_str()` | O(n) | Linear search by index |
//! | `Symbol::eq_str()` | O(1) | Hash + pointer comparison |
//!
//! # Thread Safety
//!
//! The symbol interner is fully thread-safe (`Sync + Send`). Multiple threads
//! can intern strings concurrently without blocking each other, thanks to
//! DashMap's lock-free design.
//!
//! # Memory Model
//!
//! Interned strings are allocated on the heap with `'static` lifetime.
//! They are never deallocated, which is acceptable because:
//! 1. The compiler runs for a finite duration
//! 2. The total memory usage is bounded by source code size
//! 3. This avoids complex lifetime tracking
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use ferritec_util::symbol::Symbol;
//!
//! let s1 = Symbol::intern("hello");
//! let s2 = Symbol::intern("hello");
//! let s3 = Symbol::intern("world");
//!
//! assert_eq!(s1, s2);  // Same symbol for same string
//! assert_ne!(s1, s3);  // Different strings get different symbols
//! ```
//!
//! Using known keywords:
//!
//! ```
//! use ferritec_util::symbol::{Symbol, KW_LET, KW_FUNC};
//!
//! assert_eq!(KW_LET.as_str(), "let");
//! assert_eq!(KW_FUNC.as_str(), "func");
//! assert!(KW_LET.is_known());  // Pre-defined keyword
//! ```
//!
//! Thread-safe usage:
//!
//! ```
//! use ferritec_util::symbol::Symbol;
//! use std::thread;
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         thread::spawn(move || {
//!             Symbol::intern(&format!("thread_{}", i))
//!         })
//!     })
//!     .collect();
//!
//! let symbols: Vec<_> = handles.into_iter()
//!     .map(|h| h.join().unwrap())
//!     .collect();
//!
//! // All symbols are unique
//! assert_eq!(symbols.len(), 4);
//! ```
//!
//! # Statistics and Profiling
//!
//! The interner tracks hit/miss statistics for performance profiling:
//!
//! ```
//! use ferritec_util::symbol::Symbol;
//!
//! let _ = Symbol::intern("test");
//! let _ = Symbol::intern("test");  // Hit
//!
//! let stats = Symbol::stats_struct();
//! println!("Hits: {}, Misses: {}", stats.hits, stats.misses);
//! ```

mod interner;

pub use interner::STRING_TABLE;

/// Statistics about the string interner for profiling
///
/// Provides insights into memory usage and efficiency of the interner.
///
/// # Fields
///
/// * `count` - Number of unique interned strings
/// * `capacity` - Hash map capacity (number of buckets)
/// * `collisions` - Number of hash collisions encountered
/// * `hits` - Number of times an already-interned string was requested
/// * `misses` - Number of times a new string was allocated
///
/// # Examples
///
/// ```
/// use ferritec_util::symbol::{Symbol, InternerStats};
///
/// let stats = Symbol::stats_struct();
/// println!("Interned {} strings", stats.count);
/// println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
/// println!("Load factor: {:.2}", stats.load_factor());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    /// Number of interned strings
    pub count: usize,
    /// Hash map capacity (number of buckets)
    pub capacity: usize,
    /// Number of hash collisions encountered
    pub collisions: usize,
    /// Number of cache hits (string already interned)
    pub hits: usize,
    /// Number of cache misses (new string allocation)
    pub misses: usize,
}

impl InternerStats {
    /// Create new stats with the given values
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 256, 5, 80, 20);
    /// assert_eq!(stats.count, 100);
    /// assert_eq!(stats.hits, 80);
    /// ```
    pub const fn new(
        count: usize,
        capacity: usize,
        collisions: usize,
        hits: usize,
        misses: usize,
    ) -> Self {
        Self {
            count,
            capacity,
            collisions,
            hits,
            misses,
        }
    }

    /// Calculate the load factor (count / capacity)
    ///
    /// Returns 0.0 if capacity is 0.
    ///
    /// A load factor above 0.75 indicates the hash map may need resizing.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 0, 0);
    /// assert_eq!(stats.load_factor(), 0.5);
    /// ```
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    /// Check if the interner is getting full (load factor > 0.75)
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 0, 0);
    /// assert!(!stats.is_near_capacity());
    ///
    /// let stats = InternerStats::new(100, 120, 0, 0, 0);
    /// assert!(stats.is_near_capacity());
    /// ```
    pub fn is_near_capacity(&self) -> bool {
        self.load_factor() > 0.75
    }

    /// Calculate the hit rate (hits / (hits + misses))
    ///
    /// Returns 0.0 if no lookups have been performed.
    ///
    /// A high hit rate (>0.9) indicates good interning efficiency.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 90, 10);
    /// assert_eq!(stats.hit_rate(), 0.9);
    /// ```
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get total number of interning operations
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 90, 10);
    /// assert_eq!(stats.total_operations(), 100);
    /// ```
    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }

    /// Get memory efficiency ratio (unique strings / total operations)
    ///
    /// Lower values indicate better deduplication.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(10, 100, 0, 90, 10);
    /// assert_eq!(stats.memory_efficiency(), 0.1);  // 10 unique / 100 ops
    /// ```
    pub fn memory_efficiency(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.count as f64 / self.total_operations() as f64
        }
    }
}

/// Symbol - An interned string identifier
///
/// A Symbol is a compact (4-byte) handle to a string stored in a global
/// string table. This enables O(1) string comparison and reduces memory
/// usage when the same string appears multiple times.
///
/// # Size
///
/// `Symbol` is exactly 4 bytes (u32), making it very cache-friendly compared
/// to `String` which is 24 bytes plus heap allocation.
///
/// # Thread Safety
///
/// Symbols are safe to share across threads (`Sync + Send`). The underlying
/// string table uses DashMap for lock-free concurrent access.
///
/// # Lifetime
///
/// Interned strings have `'static` lifetime and are never deallocated.
/// This is safe because the string table lives for the program duration.
///
/// # Examples
///
/// ```
/// use ferritec_util::symbol::Symbol;
///
/// let keyword = Symbol::intern("fn");
/// let name = Symbol::intern("main");
///
/// assert_eq!(keyword.as_str(), "fn");
/// assert_eq!(name.as_str(), "main");
/// assert_eq!(keyword, Symbol::intern("fn"));  // O(1) comparison
/// ```
///
/// # Performance Notes
///
/// - **Creation**: O(1) hash lookup/insert
/// - **Comparison**: O(1) index comparison
/// - **String retrieval**: O(n) linear search (avoid in hot paths)
/// - **Memory**: One allocation per unique string
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    /// Index into the global string table
    pub(crate) index: u32,
}

// ============================================================================
// KNOWN SYMBOLS (KEYWORDS AND BUILTINS)
// ============================================================================
//
/// Reserved symbol indices for known symbols (keywords, types, builtins)
///
/// All symbols with index < this value are pre-defined at compile time
/// and correspond to language keywords and primitive type names.
const RESERVED_SYMBOLS_END: u32 = 512;

// ----------------------------------------------------------------------------
// Declaration Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `let` keyword
pub const KW_LET: Symbol = Symbol { index: 0 };
/// Known symbol for the `const` keyword
pub const KW_CONST: Symbol = Symbol { index: 1 };
/// Known symbol for the `mut` keyword
pub const KW_MUT: Symbol = Symbol { index: 2 };
/// Known symbol for the `ptr` keyword
pub const KW_PTR: Symbol = Symbol { index: 3 };

// ----------------------------------------------------------------------------
// Visibility Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `private` keyword
pub const KW_PRIVATE: Symbol = Symbol { index: 4 };
/// Known symbol for the `readonly` keyword
pub const KW_READONLY: Symbol = Symbol { index: 5 };
/// Known symbol for the `public` keyword
pub const KW_PUBLIC: Symbol = Symbol { index: 6 };

// ----------------------------------------------------------------------------
// Literals
// ----------------------------------------------------------------------------

/// Known symbol for the `true` literal
pub const KW_TRUE: Symbol = Symbol { index: 7 };
/// Known symbol for the `false` literal
pub const KW_FALSE: Symbol = Symbol { index: 8 };

// ----------------------------------------------------------------------------
// Conditional Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `if` keyword
pub const KW_IF: Symbol = Symbol { index: 9 };
/// Known symbol for the `elif` keyword
pub const KW_ELIF: Symbol = Symbol { index: 10 };
/// Known symbol for the `else` keyword
pub const KW_ELSE: Symbol = Symbol { index: 11 };
/// Known symbol for the `switch` keyword
pub const KW_SWITCH: Symbol = Symbol { index: 12 };
/// Known symbol for the `case` keyword
pub const KW_CASE: Symbol = Symbol { index: 13 };
/// Known symbol for the `default` keyword
pub const KW_DEFAULT: Symbol = Symbol { index: 14 };

// ----------------------------------------------------------------------------
// Loop and Flow-Control Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `for` keyword
pub const KW_FOR: Symbol = Symbol { index: 15 };
/// Known symbol for the `while` keyword
pub const KW_WHILE: Symbol = Symbol { index: 16 };
/// Known symbol for the `repeat` keyword
pub const KW_REPEAT: Symbol = Symbol { index: 17 };
/// Known symbol for the `do` keyword
pub const KW_DO: Symbol = Symbol { index: 18 };
/// Known symbol for the `break` keyword
pub const KW_BREAK: Symbol = Symbol { index: 19 };
/// Known symbol for the `continue` keyword
pub const KW_CONTINUE: Symbol = Symbol { index: 20 };

// ----------------------------------------------------------------------------
// Function Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `func` keyword
pub const KW_FUNC: Symbol = Symbol { index: 21 };
/// Known symbol for the `lambda` keyword
pub const KW_LAMBDA: Symbol = Symbol { index: 22 };
/// Known symbol for the `return` keyword
pub const KW_RETURN: Symbol = Symbol { index: 23 };

// ----------------------------------------------------------------------------
// Module Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `import` keyword
pub const KW_IMPORT: Symbol = Symbol { index: 24 };
/// Known symbol for the `module` keyword
pub const KW_MODULE: Symbol = Symbol { index: 25 };
/// Known symbol for the `as` keyword
pub const KW_AS: Symbol = Symbol { index: 26 };

// ----------------------------------------------------------------------------
// Type Declaration Keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `aggregate` keyword
pub const KW_AGGREGATE: Symbol = Symbol { index: 27 };
/// Known symbol for the `enum` keyword
pub const KW_ENUM: Symbol = Symbol { index: 28 };
/// Known symbol for the `blueprint` keyword
pub const KW_BLUEPRINT: Symbol = Symbol { index: 29 };
/// Known symbol for the `alias` keyword
pub const KW_ALIAS: Symbol = Symbol { index: 30 };

// ----------------------------------------------------------------------------
// Primitive Type Keywords - Signed Integers
// ----------------------------------------------------------------------------

/// Known symbol for the `int8` type
pub const TY_INT8: Symbol = Symbol { index: 31 };
/// Known symbol for the `int16` type
pub const TY_INT16: Symbol = Symbol { index: 32 };
/// Known symbol for the `int32` type
pub const TY_INT32: Symbol = Symbol { index: 33 };
/// Known symbol for the `int64` type
pub const TY_INT64: Symbol = Symbol { index: 34 };

// ----------------------------------------------------------------------------
// Primitive Type Keywords - Unsigned Integers
// ----------------------------------------------------------------------------

/// Known symbol for the `uint8` type
pub const TY_UINT8: Symbol = Symbol { index: 35 };
/// Known symbol for the `uint16` type
pub const TY_UINT16: Symbol = Symbol { index: 36 };
/// Known symbol for the `uint32` type
pub const TY_UINT32: Symbol = Symbol { index: 37 };
/// Known symbol for the `uint64` type
pub const TY_UINT64: Symbol = Symbol { index: 38 };

// ----------------------------------------------------------------------------
// Primitive Type Keywords - Floats and Other
// ----------------------------------------------------------------------------

/// Known symbol for the `float32` type
pub const TY_FLOAT32: Symbol = Symbol { index: 39 };
/// Known symbol for the `float64` type
pub const TY_FLOAT64: Symbol = Symbol { index: 40 };
/// Known symbol for the `char` type
pub const TY_CHAR: Symbol = Symbol { index: 41 };
/// Known symbol for the `bool` type
pub const TY_BOOL: Symbol = Symbol { index: 42 };
/// Known symbol for the `string` type
pub const TY_STRING: Symbol = Symbol { index: 43 };

// ----------------------------------------------------------------------------
// Common Identifiers
// ----------------------------------------------------------------------------

/// Known symbol for `main`, the conventional program entry point name
pub const ID_MAIN: Symbol = Symbol { index: 44 };

impl Symbol {
    /// The maximum index value for a symbol
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Intern a string, returning its symbol
    ///
    /// This function will:
    /// 1. Hash the string to check for existing entry
    /// 2. If found, return existing symbol (cache hit)
    /// 3. If not found, allocate new slot and return new symbol (cache miss)
    ///
    /// # Thread Safety
    ///
    /// This function is thread-safe. Multiple threads can intern strings
    /// concurrently using DashMap for lock-free access.
    ///
    /// # Performance
    ///
    /// - **Best case** (string already interned): O(1) hash lookup
    /// - **Worst case** (new unique string): O(1) hash insert + allocation
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let keyword = Symbol::intern("fn");
    /// let name = Symbol::intern("main");
    ///
    /// // Interning the same string returns the same symbol
    /// assert_eq!(Symbol::intern("fn"), keyword);
    /// ```
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Get the string value associated with this symbol
    ///
    /// # Performance
    ///
    /// O(n) where n is the number of interned strings, as we need to
    /// search the DashMap by index. This is a trade-off for better
    /// concurrent write performance.
    ///
    /// For hot paths, consider caching the string reference or using
    /// [`Symbol::eq_str()`] for comparisons.
    ///
    /// # Panics
    ///
    /// Returns empty string if the symbol is invalid (e.g., created manually
    /// with an out-of-bounds index).
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(sym.as_str(), "hello");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    /// Check if the symbol's string is empty
    ///
    /// # Performance
    ///
    /// O(1) - checks if index corresponds to the empty string symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// assert!(Symbol::intern("").is_empty());
    /// assert!(!Symbol::intern("hello").is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Get the length of the symbol's string in bytes
    ///
    /// # Performance
    ///
    /// O(n) where n is the number of interned strings (requires lookup).
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// assert_eq!(Symbol::intern("hello").len(), 5);
    /// assert_eq!(Symbol::intern("").len(), 0);
    /// assert_eq!(Symbol::intern("你好").len(), 6);  // UTF-8 bytes
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Check if the symbol's string starts with a given prefix
    ///
    /// # Arguments
    ///
    /// * `prefix` - The prefix to check for
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello_world");
    /// assert!(sym.starts_with("hello"));
    /// assert!(!sym.starts_with("world"));
    /// ```
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    /// Check if the symbol's string ends with a given suffix
    ///
    /// # Arguments
    ///
    /// * `suffix` - The suffix to check for
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello_world");
    /// assert!(sym.ends_with("world"));
    /// assert!(!sym.ends_with("hello"));
    /// ```
    #[inline]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    /// Compare the symbol's string with a `&str` without allocation
    ///
    /// This is more efficient than `symbol.as_str() == other` when you
    /// only need equality comparison, as it can short-circuit early.
    ///
    /// # Arguments
    ///
    /// * `other` - The string to compare against
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert!(sym.eq_str("hello"));
    /// assert!(!sym.eq_str("world"));
    /// ```
    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Returns true if this is a "known" symbol (predefined keywords)
    ///
    /// Known symbols are interned at compiler startup and have indices
    /// in a reserved range (0 to `RESERVED_SYMBOLS_END`).
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::{Symbol, KW_LET};
    ///
    /// assert!(KW_LET.is_known());
    /// assert!(!Symbol::intern("my_variable").is_known());
    /// ```
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    /// Get the raw index value
    ///
    /// Useful for serialization or debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("test");
    /// let index = sym.as_u32();
    /// ```
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// Create a symbol from a raw index
    ///
    /// # Safety
    ///
    /// The index must correspond to a valid entry in the string table.
    /// Creating a symbol with an invalid index leads to undefined behavior
    /// when calling `as_str()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("test");
    /// let index = sym.as_u32();
    /// let sym2 = unsafe { Symbol::from_u32_unchecked(index) };
    /// assert_eq!(sym, sym2);
    /// ```
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    /// Get statistics about the string interner for profiling
    ///
    /// Returns an `InternerStats` struct with detailed information about
    /// the interner's state, including count, capacity, collisions, hits,
    /// and misses.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let stats = Symbol::stats_struct();
    /// println!("Interned {} strings", stats.count);
    /// println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
    /// ```
    #[inline]
    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }

    /// Get basic statistics about the string interner (legacy API)
    ///
    /// Returns a tuple of (number of interned strings, hash map capacity).
    /// For more detailed statistics, use [`Symbol::stats_struct`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let (count, capacity) = Symbol::stats();
    /// println!("Interned {} strings with capacity {}", count, capacity);
    /// ```
    #[inline]
    pub fn stats() -> (usize, usize) {
        let stats = STRING_TABLE.stats();
        (stats.count, stats.capacity)
    }

    /// Intern a known keyword, returning its predefined symbol
    ///
    /// This is a convenience method for interning common keywords.
    /// For known keywords, this returns the predefined constant symbol
    /// without hashing or allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::{Symbol, KW_LET};
    ///
    /// let let_sym = Symbol::intern_known("let");
    /// assert_eq!(let_sym, KW_LET);
    ///
    /// // Unknown keywords are interned normally
    /// let unknown = Symbol::intern_known("not_a_keyword");
    /// assert!(!unknown.is_known());
    /// ```
    #[inline]
    pub fn intern_known(string: &str) -> Self {
        match string {
            // Declarations
            "let" => KW_LET,
            "const" => KW_CONST,
            "mut" => KW_MUT,
            "ptr" => KW_PTR,
            // Visibility
            "private" => KW_PRIVATE,
            "readonly" => KW_READONLY,
            "public" => KW_PUBLIC,
            // Literals
            "true" => KW_TRUE,
            "false" => KW_FALSE,
            // Conditionals
            "if" => KW_IF,
            "elif" => KW_ELIF,
            "else" => KW_ELSE,
            "switch" => KW_SWITCH,
            "case" => KW_CASE,
            "default" => KW_DEFAULT,
            // Loops and flow control
            "for" => KW_FOR,
            "while" => KW_WHILE,
            "repeat" => KW_REPEAT,
            "do" => KW_DO,
            "break" => KW_BREAK,
            "continue" => KW_CONTINUE,
            // Functions
            "func" => KW_FUNC,
            "lambda" => KW_LAMBDA,
            "return" => KW_RETURN,
            // Modules
            "import" => KW_IMPORT,
            "module" => KW_MODULE,
            "as" => KW_AS,
            // Type declarations
            "aggregate" => KW_AGGREGATE,
            "enum" => KW_ENUM,
            "blueprint" => KW_BLUEPRINT,
            "alias" => KW_ALIAS,
            // Primitive types - signed integers
            "int8" => TY_INT8,
            "int16" => TY_INT16,
            "int32" => TY_INT32,
            "int64" => TY_INT64,
            // Primitive types - unsigned integers
            "uint8" => TY_UINT8,
            "uint16" => TY_UINT16,
            "uint32" => TY_UINT32,
            "uint64" => TY_UINT64,
            // Primitive types - floats and other
            "float32" => TY_FLOAT32,
            "float64" => TY_FLOAT64,
            "char" => TY_CHAR,
            "bool" => TY_BOOL,
            "string" => TY_STRING,
            // Common identifiers
            "main" => ID_MAIN,
            _ => Self::intern(string),
        }
    }

    /// Get the symbol for a primitive type keyword
    ///
    /// Returns the predefined symbol for primitive type keywords,
    /// or interns the string for unknown (user-declared) types.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::{Symbol, TY_INT32, TY_STRING};
    ///
    /// assert_eq!(Symbol::intern_type("int32"), TY_INT32);
    /// assert_eq!(Symbol::intern_type("string"), TY_STRING);
    /// ```
    #[inline]
    pub fn intern_type(string: &str) -> Self {
        match string {
            "int8" => TY_INT8,
            "int16" => TY_INT16,
            "int32" => TY_INT32,
            "int64" => TY_INT64,
            "uint8" => TY_UINT8,
            "uint16" => TY_UINT16,
            "uint32" => TY_UINT32,
            "uint64" => TY_UINT64,
            "float32" => TY_FLOAT32,
            "float64" => TY_FLOAT64,
            "char" => TY_CHAR,
            "bool" => TY_BOOL,
            "string" => TY_STRING,
            _ => Self::intern(string),
        }
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

impl std::fmt::Debug for Symbol {
    /// Format the symbol for debugging, showing the actual string content
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(format!("{:?}", sym), "Symbol(hello)");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    /// Format the symbol for display, showing just the string content
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(format!("{}", sym), "hello");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pretty-print a symbol with quotes for debugging
///
/// This trait provides optional pretty-printing with quotes to distinguish
/// symbols from regular strings in debug output.
///
/// # Examples
///
/// ```
/// use ferritec_util::symbol::{Symbol, SymbolPretty};
///
/// let sym = Symbol::intern("hello");
/// assert_eq!(format!("{}", sym.pretty()), "\"hello\"");
/// ```
pub trait SymbolPretty {
    /// Get a pretty-printed version with quotes
    fn pretty(&self) -> SymbolPrettyDisplay<'_>;
}

impl SymbolPretty for Symbol {
    fn pretty(&self) -> SymbolPrettyDisplay<'_> {
        SymbolPrettyDisplay(self)
    }
}

/// Display wrapper for pretty-printing symbols with quotes
pub struct SymbolPrettyDisplay<'a>(&'a Symbol);

impl std::fmt::Display for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.as_str())
    }
}

impl std::fmt::Debug for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolPretty(\"{}\")", self.0.as_str())
    }
}

// Ensure Symbol is thread-safe
static_assertions::assert_impl_all!(Symbol: Send, Sync);
