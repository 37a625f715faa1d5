use date_json::shape::{date_marker_candidate, DATE_KEY};
use date_json::{date_marker, DateInstant, MaybeAbsent, RichValue, WireValue, MAX_EPOCH_MILLIS};
use indexmap::IndexMap;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Relative weights for each node type.
#[derive(Debug, Clone)]
pub struct NodeOdds {
    pub undefined: u32,
    pub null: u32,
    pub boolean: u32,
    pub number: u32,
    pub string: u32,
    pub date: u32,
    pub array: u32,
    pub object: u32,
}

impl Default for NodeOdds {
    fn default() -> Self {
        Self {
            undefined: 1,
            null: 1,
            boolean: 2,
            number: 8,
            string: 8,
            date: 4,
            array: 2,
            object: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomDateJsonOptions {
    /// PRNG seed. A random one is drawn from the OS when `None`.
    pub seed: Option<[u8; 32]>,
    /// Containers are not generated below this depth.
    pub max_depth: usize,
    /// Upper bound on array length and object key count.
    pub max_width: usize,
    pub odds: NodeOdds,
}

impl Default for RandomDateJsonOptions {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: 4,
            max_width: 6,
            odds: NodeOdds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeType {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Date,
    Array,
    Object,
}

/// Seedable generator of random value trees.
///
/// # Examples
///
/// ```
/// use date_json::{decode, deep_equal, encode};
/// use date_json_random::RandomDateJson;
///
/// let mut random = RandomDateJson::seeded(42);
/// let value = random.rich();
/// let back = decode(&encode(&value).unwrap()).unwrap();
/// assert!(deep_equal(&value, &back));
/// ```
pub struct RandomDateJson {
    /// The seed used to initialize the PRNG; print it to replay a failure.
    pub seed: [u8; 32],
    opts: RandomDateJsonOptions,
    rng: Xoshiro256StarStar,
}

impl RandomDateJson {
    pub fn new(opts: RandomDateJsonOptions) -> Self {
        let seed = opts.seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });
        Self {
            seed,
            rng: Xoshiro256StarStar::from_seed(seed),
            opts,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&seed.to_le_bytes());
        Self::new(RandomDateJsonOptions {
            seed: Some(bytes),
            ..RandomDateJsonOptions::default()
        })
    }

    /// A rich tree that survives `decode(encode(v))`.
    pub fn rich(&mut self) -> RichValue {
        self.rich_node(0)
    }

    /// A well-formed wire tree that survives `encode(decode(w))`.
    pub fn wire(&mut self) -> WireValue {
        self.wire_node(0)
    }

    fn rich_node(&mut self, depth: usize) -> RichValue {
        match self.pick_node_type(depth) {
            NodeType::Undefined => RichValue::Undefined,
            NodeType::Null => RichValue::Null,
            NodeType::Boolean => RichValue::Bool(self.rng.gen_bool(0.5)),
            NodeType::Number => RichValue::Number(self.gen_number()),
            NodeType::String => RichValue::Str(self.gen_string()),
            NodeType::Date => RichValue::Date(self.gen_date()),
            NodeType::Array => {
                let len = self.rng.gen_range(0..=self.opts.max_width);
                RichValue::Array((0..len).map(|_| self.rich_node(depth + 1)).collect())
            }
            NodeType::Object => {
                let len = self.rng.gen_range(0..=self.opts.max_width);
                let mut map = IndexMap::with_capacity(len);
                for _ in 0..len {
                    let key = self.gen_key();
                    let val = self.rich_node(depth + 1);
                    map.insert(key, val);
                }
                disambiguate(&mut map, RichValue::Null);
                RichValue::Object(map)
            }
        }
    }

    fn wire_node(&mut self, depth: usize) -> WireValue {
        match self.pick_node_type(depth) {
            NodeType::Undefined => WireValue::Undefined,
            NodeType::Null => WireValue::Null,
            NodeType::Boolean => WireValue::Bool(self.rng.gen_bool(0.5)),
            NodeType::Number => WireValue::Number(self.gen_number()),
            NodeType::String => WireValue::Str(self.gen_string()),
            NodeType::Date => date_marker(self.gen_date()),
            NodeType::Array => {
                let len = self.rng.gen_range(0..=self.opts.max_width);
                WireValue::Array((0..len).map(|_| self.wire_node(depth + 1)).collect())
            }
            NodeType::Object => {
                let len = self.rng.gen_range(0..=self.opts.max_width);
                let mut map = IndexMap::with_capacity(len);
                for _ in 0..len {
                    let key = self.gen_key();
                    let val = self.wire_node(depth + 1);
                    map.insert(key, val);
                }
                // Real markers come from NodeType::Date only.
                disambiguate(&mut map, WireValue::Null);
                WireValue::Object(map)
            }
        }
    }

    fn pick_node_type(&mut self, depth: usize) -> NodeType {
        let odds = &self.opts.odds;
        let containers = depth < self.opts.max_depth;
        let weights = [
            (NodeType::Undefined, odds.undefined),
            (NodeType::Null, odds.null),
            (NodeType::Boolean, odds.boolean),
            (NodeType::Number, odds.number),
            (NodeType::String, odds.string),
            (NodeType::Date, odds.date),
            (NodeType::Array, if containers { odds.array } else { 0 }),
            (NodeType::Object, if containers { odds.object } else { 0 }),
        ];
        let total: u32 = weights.iter().map(|(_, w)| w).sum();
        if total == 0 {
            return NodeType::Null;
        }
        let mut roll = self.rng.gen_range(0..total);
        for (node_type, weight) in weights {
            if roll < weight {
                return node_type;
            }
            roll -= weight;
        }
        NodeType::Null
    }

    fn gen_number(&mut self) -> f64 {
        if self.rng.gen_bool(0.5) {
            f64::from(self.rng.gen_range(-1000..=1000))
        } else if self.rng.gen_bool(0.5) {
            self.rng.gen::<f64>() * 1e9 - 5e8
        } else {
            // Integral but beyond i32.
            self.rng.gen_range(-(1i64 << 53)..=(1i64 << 53)) as f64
        }
    }

    fn gen_date(&mut self) -> DateInstant {
        let ms = if self.rng.gen_bool(0.8) {
            // 1900..2100, roughly.
            self.rng.gen_range(-2_208_988_800_000i64..=4_102_444_800_000)
        } else {
            self.rng.gen_range(-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS)
        };
        DateInstant::from_millis(ms).unwrap_or(DateInstant::UNIX_EPOCH)
    }

    fn gen_string(&mut self) -> String {
        const EXTRA: [char; 8] = ['\n', '"', '\\', '/', '~', 'ä', '必', '👍'];
        let len = self.rng.gen_range(0..=8);
        (0..len)
            .map(|_| {
                if self.rng.gen_bool(0.1) {
                    EXTRA[self.rng.gen_range(0..EXTRA.len())]
                } else {
                    char::from(self.rng.gen_range(32u8..=126))
                }
            })
            .collect()
    }

    fn gen_key(&mut self) -> String {
        if self.rng.gen_bool(0.1) {
            DATE_KEY.to_string()
        } else {
            self.gen_string()
        }
    }
}

/// Gives a lone `$date` key a sibling so the object cannot pass for a marker.
fn disambiguate<V: MaybeAbsent>(map: &mut IndexMap<String, V>, filler: V) {
    if date_marker_candidate(map).is_some() {
        map.insert(format!("{DATE_KEY}_sibling"), filler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use date_json::{decode, deep_equal, deep_equal_wire, encode, EncodeError};

    #[test]
    fn test_same_seed_same_tree() {
        let a = RandomDateJson::seeded(7).rich();
        let b = RandomDateJson::seeded(7).rich();
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn test_rich_trees_encode() {
        let mut random = RandomDateJson::seeded(1);
        for _ in 0..200 {
            let value = random.rich();
            let res = encode(&value);
            assert!(
                !matches!(res, Err(EncodeError::AmbiguousDateMarker { .. })),
                "seed {:?} produced an ambiguous marker",
                random.seed
            );
            assert!(res.is_ok());
        }
    }

    #[test]
    fn test_wire_trees_decode() {
        let mut random = RandomDateJson::seeded(2);
        for _ in 0..200 {
            let wire = random.wire();
            let rich = decode(&wire).expect("decode");
            let back = encode(&rich).expect("encode");
            assert!(deep_equal_wire(&wire, &back));
        }
    }

    #[test]
    fn test_depth_zero_has_no_containers() {
        let mut random = RandomDateJson::new(RandomDateJsonOptions {
            seed: Some([3; 32]),
            max_depth: 0,
            ..RandomDateJsonOptions::default()
        });
        for _ in 0..50 {
            assert!(!matches!(
                random.rich(),
                RichValue::Array(_) | RichValue::Object(_)
            ));
        }
    }

    #[test]
    fn test_disambiguate() {
        let mut map: IndexMap<String, RichValue> =
            [(DATE_KEY.to_string(), RichValue::from(1))].into_iter().collect();
        disambiguate(&mut map, RichValue::Null);
        assert_eq!(map.len(), 2);
        assert!(date_marker_candidate(&map).is_none());
    }
}
