//! Inline runtime helpers for lowered scripts.
//!
//! The transformer runs in external-helper mode, so lowered syntax calls
//! `babelHelpers.<name>(...)`. Each output file gets a prelude defining
//! exactly the helpers it references (plus their dependencies), which keeps
//! every script self-contained in a plain `<script>` tag. Definitions are
//! guarded, so several scripts on one page share the same global object.

use super::TransformError;

const HELPER_OBJECT: &str = "babelHelpers.";

struct Helper {
    name: &'static str,
    deps: &'static [&'static str],
    /// A function expression (or expression evaluating to one).
    source: &'static str,
}

const HELPERS: &[Helper] = &[
    Helper {
        name: "toPrimitive",
        deps: &[],
        source: r#"function (input, hint) {
  if (typeof input !== "object" || input === null) return input;
  var prim = input[Symbol.toPrimitive];
  if (prim !== undefined) {
    var res = prim.call(input, hint || "default");
    if (typeof res !== "object") return res;
    throw new TypeError("@@toPrimitive must return a primitive value.");
  }
  return (hint === "string" ? String : Number)(input);
}"#,
    },
    Helper {
        name: "toPropertyKey",
        deps: &["toPrimitive"],
        source: r#"function (arg) {
  var key = babelHelpers.toPrimitive(arg, "string");
  return typeof key === "symbol" ? key : String(key);
}"#,
    },
    Helper {
        name: "defineProperty",
        deps: &["toPropertyKey"],
        source: r#"function (obj, key, value) {
  key = babelHelpers.toPropertyKey(key);
  if (key in obj) {
    Object.defineProperty(obj, key, { value: value, enumerable: true, configurable: true, writable: true });
  } else {
    obj[key] = value;
  }
  return obj;
}"#,
    },
    Helper {
        name: "objectSpread2",
        deps: &["defineProperty"],
        source: r#"function (target) {
  function ownKeys(object, enumerableOnly) {
    var keys = Object.keys(object);
    if (Object.getOwnPropertySymbols) {
      var symbols = Object.getOwnPropertySymbols(object);
      if (enumerableOnly) {
        symbols = symbols.filter(function (sym) {
          return Object.getOwnPropertyDescriptor(object, sym).enumerable;
        });
      }
      keys.push.apply(keys, symbols);
    }
    return keys;
  }
  for (var i = 1; i < arguments.length; i++) {
    var source = arguments[i] != null ? arguments[i] : {};
    if (i % 2) {
      ownKeys(Object(source), true).forEach(function (key) {
        babelHelpers.defineProperty(target, key, source[key]);
      });
    } else if (Object.getOwnPropertyDescriptors) {
      Object.defineProperties(target, Object.getOwnPropertyDescriptors(source));
    } else {
      ownKeys(Object(source)).forEach(function (key) {
        Object.defineProperty(target, key, Object.getOwnPropertyDescriptor(source, key));
      });
    }
  }
  return target;
}"#,
    },
    Helper {
        name: "extends",
        deps: &[],
        source: r#"(Object.assign || function (target) {
  for (var i = 1; i < arguments.length; i++) {
    var source = arguments[i];
    for (var key in source) {
      if (Object.prototype.hasOwnProperty.call(source, key)) target[key] = source[key];
    }
  }
  return target;
})"#,
    },
    Helper {
        name: "objectWithoutPropertiesLoose",
        deps: &[],
        source: r#"function (source, excluded) {
  if (source == null) return {};
  var target = {};
  for (var key in source) {
    if (Object.prototype.hasOwnProperty.call(source, key)) {
      if (excluded.indexOf(key) !== -1) continue;
      target[key] = source[key];
    }
  }
  return target;
}"#,
    },
    Helper {
        name: "objectWithoutProperties",
        deps: &["objectWithoutPropertiesLoose"],
        source: r#"function (source, excluded) {
  if (source == null) return {};
  var target = babelHelpers.objectWithoutPropertiesLoose(source, excluded);
  if (Object.getOwnPropertySymbols) {
    var symbols = Object.getOwnPropertySymbols(source);
    for (var i = 0; i < symbols.length; i++) {
      var key = symbols[i];
      if (excluded.indexOf(key) !== -1) continue;
      if (!Object.prototype.propertyIsEnumerable.call(source, key)) continue;
      target[key] = source[key];
    }
  }
  return target;
}"#,
    },
    Helper {
        name: "objectDestructuringEmpty",
        deps: &[],
        source: r#"function (obj) {
  if (obj == null) throw new TypeError("Cannot destructure " + obj);
}"#,
    },
    Helper {
        name: "asyncToGenerator",
        deps: &[],
        source: r#"function (fn) {
  return function () {
    var self = this, args = arguments;
    return new Promise(function (resolve, reject) {
      var gen = fn.apply(self, args);
      function step(key, arg) {
        var info, value;
        try {
          info = gen[key](arg);
          value = info.value;
        } catch (error) {
          reject(error);
          return;
        }
        if (info.done) resolve(value);
        else Promise.resolve(value).then(next, fail);
      }
      function next(value) { step("next", value); }
      function fail(err) { step("throw", err); }
      next(undefined);
    });
  };
}"#,
    },
    Helper {
        name: "checkPrivateRedeclaration",
        deps: &[],
        source: r#"function (obj, privateCollection) {
  if (privateCollection.has(obj)) {
    throw new TypeError("Cannot initialize the same private elements twice on an object");
  }
}"#,
    },
    Helper {
        name: "classPrivateFieldInitSpec",
        deps: &["checkPrivateRedeclaration"],
        source: r#"function (obj, privateMap, value) {
  babelHelpers.checkPrivateRedeclaration(obj, privateMap);
  privateMap.set(obj, value);
}"#,
    },
    Helper {
        name: "classPrivateMethodInitSpec",
        deps: &["checkPrivateRedeclaration"],
        source: r#"function (obj, privateSet) {
  babelHelpers.checkPrivateRedeclaration(obj, privateSet);
  privateSet.add(obj);
}"#,
    },
    Helper {
        name: "assertClassBrand",
        deps: &[],
        source: r#"function (brand, receiver, value) {
  if (typeof brand === "function" ? brand === receiver : brand.has(receiver)) {
    return arguments.length < 3 ? receiver : value;
  }
  throw new TypeError("Private element is not present on this object");
}"#,
    },
    Helper {
        name: "classPrivateFieldGet2",
        deps: &["assertClassBrand"],
        source: r#"function (privateMap, receiver) {
  return privateMap.get(babelHelpers.assertClassBrand(privateMap, receiver));
}"#,
    },
    Helper {
        name: "classPrivateFieldSet2",
        deps: &["assertClassBrand"],
        source: r#"function (privateMap, receiver, value) {
  privateMap.set(babelHelpers.assertClassBrand(privateMap, receiver), value);
  return value;
}"#,
    },
];

fn lookup(name: &str) -> Option<&'static Helper> {
    HELPERS.iter().find(|h| h.name == name)
}

/// Helper names referenced as `babelHelpers.<name>` in `code`, in order of
/// first appearance.
fn referenced(code: &str) -> Vec<&str> {
    let mut names = Vec::new();
    for (start, _) in code.match_indices(HELPER_OBJECT) {
        let rest = &code[start + HELPER_OBJECT.len()..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Definitions for every helper `code` uses, or an empty string.
///
/// A helper missing from the table is an error: emitting the call without
/// its definition would fail at page load.
pub fn prelude_for(code: &str) -> Result<String, TransformError> {
    let mut needed: Vec<&'static Helper> = Vec::new();
    let mut pending: Vec<String> = referenced(code).into_iter().map(str::to_string).collect();

    while let Some(name) = pending.pop() {
        if needed.iter().any(|h| h.name == name) {
            continue;
        }
        let helper = lookup(&name)
            .ok_or_else(|| TransformError::Script(format!("unsupported runtime helper `{name}`")))?;
        pending.extend(helper.deps.iter().map(|d| d.to_string()));
        needed.push(helper);
    }

    if needed.is_empty() {
        return Ok(String::new());
    }

    let mut prelude = String::from("var babelHelpers = babelHelpers || {};\n");
    for helper in needed.iter().rev() {
        prelude.push_str(&format!(
            "babelHelpers.{0} = babelHelpers.{0} || {1};\n",
            helper.name, helper.source
        ));
    }
    Ok(prelude)
}
