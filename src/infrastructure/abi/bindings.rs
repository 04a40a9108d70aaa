//! Solidity interfaces of the token and its factory

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract MiniMeToken {
        event Transfer(address indexed from, address indexed to, uint256 amount);
        event Approval(address indexed owner, address indexed spender, uint256 amount);
        event NewCloneToken(address indexed cloneToken, uint256 snapshotBlock);

        constructor(
            address tokenFactory,
            address parentToken,
            uint256 parentSnapShotBlock,
            string memory tokenName,
            uint8 decimalUnits,
            string memory tokenSymbol,
            bool transfersEnabled
        );

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function version() external view returns (string memory);
        function decimals() external view returns (uint8);
        function controller() external view returns (address);
        function parentToken() external view returns (address);
        function parentSnapShotBlock() external view returns (uint256);
        function transfersEnabled() external view returns (bool);

        function totalSupply() external view returns (uint256);
        function totalSupplyAt(uint256 blockNumber) external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function balanceOfAt(address owner, uint256 blockNumber) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function generateTokens(address owner, uint256 amount) external returns (bool);
        function destroyTokens(address owner, uint256 amount) external returns (bool);
        function enableTransfers(bool transfersEnabled) external;
        function changeController(address newController) external;

        function createCloneToken(
            string memory cloneTokenName,
            uint8 cloneDecimalUnits,
            string memory cloneTokenSymbol,
            uint256 snapshotBlock,
            bool transfersEnabled
        ) external returns (address);
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    contract MiniMeTokenFactory {
        function createCloneToken(
            address parentToken,
            uint256 snapshotBlock,
            string memory tokenName,
            uint8 decimalUnits,
            string memory tokenSymbol,
            bool transfersEnabled
        ) external returns (address);
    }
}
