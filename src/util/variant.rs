use std::fmt;

// 戦略パラメータの値
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Int(i32),
}

impl Variant {
    pub fn as_int(&self) -> Result<i32, String> {
        match self {
            Self::Int(v) => Ok(*v),
        }
    }

    // 自身と同じ型としてvalueをパース
    pub fn parse_as(&self, value: &str) -> Result<Variant, String> {
        Ok(match self {
            Self::Int(_) => Self::Int(value.parse::<i32>().map_err(|e| e.to_string())?),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: String,
    pub value: Variant,
}

impl Arg {
    pub fn int(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Int(value),
        }
    }
}

// "Name(arg0,arg1,...)" 形式の設定
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Config {
    // 式を名前と引数文字列のリストに分解
    pub fn split_expression(exp: &str) -> Result<(&str, Vec<&str>), String> {
        let exp = exp.trim();
        let paren_left = exp.find('(');
        let paren_right = exp.rfind(')');
        match (paren_left, paren_right) {
            (Some(l), Some(r)) => {
                if r < l || r != exp.len() - 1 {
                    return Err(format!("invalid paren: {}", exp));
                }
                let inner = exp[l + 1..r].trim();
                let args = if inner.is_empty() {
                    vec![]
                } else {
                    inner.split(',').map(|a| a.trim()).collect()
                };
                Ok((&exp[..l], args))
            }
            (None, None) => Ok((exp, vec![])),
            _ => Err(format!("invalid paren: {}", exp)),
        }
    }

    // 既定値の設定に引数文字列を上書き. 空の引数は既定値のまま.
    pub fn apply_args(&mut self, args: &[&str]) -> Result<(), String> {
        if self.args.len() < args.len() {
            return Err(format!(
                "expected {} arguments for {}. but {} arguments are provided.",
                self.args.len(),
                self.name,
                args.len(),
            ));
        }

        for (i, &a) in args.iter().enumerate() {
            if !a.is_empty() {
                self.args[i].value = self.args[i]
                    .value
                    .parse_as(a)
                    .map_err(|e| format!("{}: {}={}", e, self.args[i].name, a))?;
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Variant, String> {
        self.args
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
            .ok_or_else(|| format!("{}: unknown argument '{}'", self.name, name))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_str = self
            .args
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{}({})", self.name, arg_str)
    }
}

#[test]
fn test_config_args() {
    let (name, args) = Config::split_expression("Tanyao(2,)").unwrap();
    assert_eq!(name, "Tanyao");
    assert_eq!(args, vec!["2", ""]);

    let mut conf = Config {
        name: "Tanyao".to_string(),
        args: vec![Arg::int("min_shanten", 3), Arg::int("max_remaining_tiles", 10)],
    };
    conf.apply_args(&args).unwrap();
    assert_eq!(conf.get("min_shanten").unwrap().as_int(), Ok(2));
    assert_eq!(conf.get("max_remaining_tiles").unwrap().as_int(), Ok(10));
    assert_eq!(conf.to_string(), "Tanyao(min_shanten=2,max_remaining_tiles=10)");

    assert!(conf.apply_args(&["x"]).is_err());
    assert!(conf.apply_args(&["1", "2", "3"]).is_err());
    assert!(Config::split_expression("Tanyao)2(").is_err());
    assert_eq!(Config::split_expression("Yakuhai").unwrap(), ("Yakuhai", vec![]));
    assert!(conf.get("unknown").is_err());
}
