//! Compiled contract artifacts (ABI + creation bytecode) loaded at run time

use std::fs;
use std::path::Path;

use alloy::primitives::Bytes;
use alloy_json_abi::JsonAbi;
use serde_json::Value;

use crate::{Error, Result};

const FACTORY_CONTRACT: &str = "MiniMeTokenFactory";
const TOKEN_CONTRACT: &str = "MiniMeToken";

/// A single compiled contract
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| Error::Artifact(format!("{}: {err}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|err| Error::Artifact(err.to_string()))?;
        Self::from_value(&value)
    }

    /// Accepts solc-js / Truffle (`bytecode: "0x.."`), Foundry
    /// (`bytecode: { object: "0x.." }`) and solc combined-json (`bin`) layouts.
    pub fn from_value(value: &Value) -> Result<Self> {
        let abi_value = value
            .get("abi")
            .ok_or_else(|| Error::Artifact("missing `abi`".into()))?;
        // solc combined-json stores the ABI as an encoded string
        let abi: JsonAbi = match abi_value {
            Value::String(encoded) => serde_json::from_str::<JsonAbi>(encoded),
            other => serde_json::from_value::<JsonAbi>(other.clone()),
        }
        .map_err(|err| Error::Artifact(format!("bad abi: {err}")))?;

        let code = value
            .get("bytecode")
            .or_else(|| value.get("bin"))
            .and_then(|code| match code {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) => obj.get("object").and_then(Value::as_str),
                _ => None,
            })
            .ok_or_else(|| Error::Artifact("missing `bytecode`".into()))?;

        let bytecode = decode_bytecode(code)?;
        if bytecode.is_empty() {
            return Err(Error::Artifact("empty bytecode (abstract contract?)".into()));
        }

        Ok(Self { abi, bytecode })
    }
}

/// Factory and token artifacts needed to deploy a fresh token
#[derive(Debug, Clone)]
pub struct TokenArtifacts {
    pub factory: ContractArtifact,
    pub token: ContractArtifact,
}

impl TokenArtifacts {
    pub fn new(factory: ContractArtifact, token: ContractArtifact) -> Result<Self> {
        let constructor_inputs = token.abi.constructor.as_ref().map(|c| c.inputs.len());
        if constructor_inputs != Some(7) {
            return Err(Error::Artifact(format!(
                "token constructor takes {constructor_inputs:?} arguments, expected 7"
            )));
        }
        if token.abi.function("createCloneToken").is_none() {
            return Err(Error::Artifact("token ABI has no createCloneToken".into()));
        }
        Ok(Self { factory, token })
    }

    /// Load a bundle keyed by contract name, e.g.
    /// `{ "MiniMeTokenFactory": {..}, "MiniMeToken": {..} }`.
    /// solc combined-json nests the same map under `contracts` with
    /// `path:Name` keys.
    pub fn from_bundle_json(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|err| Error::Artifact(err.to_string()))?;
        let contracts = value.get("contracts").unwrap_or(&value);
        let factory = find_contract(contracts, FACTORY_CONTRACT)?;
        let token = find_contract(contracts, TOKEN_CONTRACT)?;
        Self::new(
            ContractArtifact::from_value(factory)?,
            ContractArtifact::from_value(token)?,
        )
    }

    pub fn from_bundle_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| Error::Artifact(format!("{}: {err}", path.display())))?;
        Self::from_bundle_json(&content)
    }

    pub fn from_files(factory: impl AsRef<Path>, token: impl AsRef<Path>) -> Result<Self> {
        Self::new(
            ContractArtifact::from_file(factory)?,
            ContractArtifact::from_file(token)?,
        )
    }
}

fn find_contract<'a>(contracts: &'a Value, name: &str) -> Result<&'a Value> {
    let Some(map) = contracts.as_object() else {
        return Err(Error::Artifact("bundle is not a JSON object".into()));
    };
    map.get(name)
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.rsplit(':').next() == Some(name))
                .map(|(_, v)| v)
        })
        .ok_or_else(|| Error::Artifact(format!("bundle has no `{name}`")))
}

fn decode_bytecode(code: &str) -> Result<Bytes> {
    let code = code.trim();
    let payload = code
        .strip_prefix("0x")
        .or_else(|| code.strip_prefix("0X"))
        .unwrap_or(code);
    if payload.contains("__") {
        return Err(Error::Artifact("bytecode has unlinked library placeholders".into()));
    }
    hex::decode(payload)
        .map(Bytes::from)
        .map_err(|err| Error::Artifact(format!("bad bytecode hex: {err}")))
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fixtures::{factory_json, token_json};
    use super::*;

    #[test]
    fn test_bytecode_layouts() {
        let truffle = ContractArtifact::from_value(&factory_json()).unwrap();
        assert_eq!(&truffle.bytecode[..], &[0x60, 0x80, 0x60, 0x40, 0x52]);

        let foundry = ContractArtifact::from_value(&token_json()).unwrap();
        assert_eq!(foundry.bytecode.len(), 5);
        assert!(foundry.abi.constructor.is_some());

        let combined = json!({ "abi": "[]", "bin": "6001" });
        let artifact = ContractArtifact::from_value(&combined).unwrap();
        assert_eq!(&artifact.bytecode[..], &[0x60, 0x01]);
    }

    #[test]
    fn test_rejects_unusable_bytecode() {
        let empty = json!({ "abi": [], "bytecode": "0x" });
        assert!(matches!(ContractArtifact::from_value(&empty), Err(Error::Artifact(_))));

        let unlinked = json!({ "abi": [], "bytecode": "0x60__$abc$__60" });
        assert!(ContractArtifact::from_value(&unlinked).is_err());

        let missing = json!({ "abi": [] });
        assert!(ContractArtifact::from_value(&missing).is_err());
    }

    #[test]
    fn test_bundle_lookup() {
        let bundle = json!({
            "MiniMeTokenFactory": factory_json(),
            "MiniMeToken": token_json(),
        });
        let artifacts = TokenArtifacts::from_bundle_json(&bundle.to_string()).unwrap();
        assert_eq!(artifacts.factory.bytecode.len(), 5);

        let combined = json!({
            "contracts": {
                "contracts/MiniMeToken.sol:MiniMeTokenFactory": factory_json(),
                "contracts/MiniMeToken.sol:MiniMeToken": token_json(),
            }
        });
        assert!(TokenArtifacts::from_bundle_json(&combined.to_string()).is_ok());
    }

    #[test]
    fn test_token_artifact_must_match_interface() {
        let factory = ContractArtifact::from_value(&factory_json()).unwrap();
        // factory ABI has no 7-argument constructor
        let err = TokenArtifacts::new(factory.clone(), factory).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }
}
