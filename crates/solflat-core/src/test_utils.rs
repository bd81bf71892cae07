//! Test utilities for Solflat

use crate::model::{CompilationSnapshot, FileKey};
use crate::resolve::PathResolver;

/// A imports B, B imports C.
pub fn chain_snapshot() -> CompilationSnapshot {
    CompilationSnapshot::new("browser/A.sol")
        .with_file(
            "browser/A.sol",
            "pragma solidity ^0.8.0;\nimport \"./B.sol\";\n\ncontract A is B {}\n",
            &["./B.sol"],
        )
        .with_file(
            "browser/B.sol",
            "pragma solidity ^0.8.0;\nimport \"./C.sol\";\n\ncontract B is C {}\n",
            &["./C.sol"],
        )
        .with_file(
            "browser/C.sol",
            "pragma solidity ^0.8.0;\n\ncontract C {}\n",
            &[],
        )
}

/// A imports B and C, both of which import D.
pub fn diamond_snapshot() -> CompilationSnapshot {
    CompilationSnapshot::new("A.sol")
        .with_file("A.sol", "import \"./B.sol\";\nimport \"./C.sol\";\ncontract A is B, C {}\n", &["./B.sol", "./C.sol"])
        .with_file("B.sol", "import \"./D.sol\";\ncontract B is D {}\n", &["./D.sol"])
        .with_file("C.sol", "import \"./D.sol\";\ncontract C is D {}\n", &["./D.sol"])
        .with_file("D.sol", "contract D {}\n", &[])
}

/// A and B import each other.
pub fn mutual_snapshot() -> CompilationSnapshot {
    CompilationSnapshot::new("A.sol")
        .with_file("A.sol", "import \"./B.sol\";\ncontract A {}\n", &["./B.sol"])
        .with_file("B.sol", "import \"./A.sol\";\ncontract B {}\n", &["./A.sol"])
}

/// A small project mixing relative and package-style imports.
pub fn project_snapshot() -> CompilationSnapshot {
    CompilationSnapshot::new("contracts/Token.sol")
        .with_file(
            "contracts/Token.sol",
            concat!(
                "// SPDX-License-Identifier: MIT\n",
                "pragma solidity ^0.8.0;\n",
                "\n",
                "import \"@openzeppelin/contracts/token/ERC20/ERC20.sol\";\n",
                "import {Ownable} from \"./access/Ownable.sol\";\n",
                "\n",
                "contract Token is ERC20, Ownable {\n",
                "    constructor() ERC20(\"T\", \"T\") {}\n",
                "}\n",
            ),
            &["@openzeppelin/contracts/token/ERC20/ERC20.sol", "./access/Ownable.sol"],
        )
        .with_file(
            "contracts/access/Ownable.sol",
            "pragma solidity ^0.8.0;\nimport \"../utils/Context.sol\";\n\nabstract contract Ownable is Context {}\n",
            &["../utils/Context.sol"],
        )
        .with_file(
            "contracts/utils/Context.sol",
            "pragma solidity ^0.8.0;\n\nabstract contract Context {}\n",
            &[],
        )
        .with_file(
            "@openzeppelin/contracts/token/ERC20/ERC20.sol",
            "pragma solidity ^0.8.0;\nimport \"./IERC20.sol\";\nimport \"../../utils/Context.sol\";\n\ncontract ERC20 is Context, IERC20 {}\n",
            &["./IERC20.sol", "../../utils/Context.sol"],
        )
        .with_file(
            "@openzeppelin/contracts/token/ERC20/IERC20.sol",
            "pragma solidity ^0.8.0;\n\ninterface IERC20 {}\n",
            &[],
        )
        .with_file(
            "@openzeppelin/contracts/utils/Context.sol",
            "pragma solidity ^0.8.0;\n\nabstract contract Context {}\n",
            &[],
        )
}

/// Assert that every file in `order` comes after each file it imports.
pub fn assert_dependees_first(snapshot: &CompilationSnapshot, order: &[FileKey]) {
    let resolver = PathResolver::new();
    let position = |key: &FileKey| order.iter().position(|k| k == key);

    for importer in order {
        let Some(unit) = snapshot.asts.get(importer) else {
            continue;
        };
        let importer_pos = position(importer).unwrap();
        for spec in unit.import_specifiers() {
            let dep = resolver.resolve(importer, spec);
            let dep_pos = position(&dep)
                .unwrap_or_else(|| panic!("{} (imported by {}) missing from order", dep, importer));
            assert!(
                dep_pos < importer_pos,
                "{} must precede its importer {} in {:?}",
                dep,
                importer,
                order
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_self_consistent() {
        for snapshot in [chain_snapshot(), diamond_snapshot(), mutual_snapshot(), project_snapshot()] {
            assert!(snapshot.asts.contains_key(&snapshot.target));
            assert_eq!(snapshot.asts.len(), snapshot.sources.len());
        }
    }
}
