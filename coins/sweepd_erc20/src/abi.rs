//! ERC-20 ABI bindings

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);

        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

/// ABI-encodes `transfer(to, amount)`.
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};
    use alloy::sol_types::SolEvent;

    #[test]
    fn test_transfer_encoding() {
        let to = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let encoded = encode_transfer(to, U256::from(50u64));

        // transfer(address,uint256) function selector is 0xa9059cbb
        assert_eq!(&encoded[0..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // 4 selector + 32 address + 32 amount
        assert_eq!(encoded.len(), 68);
        assert_eq!(&encoded[16..36], to.as_slice());
        assert_eq!(encoded[67], 50);
    }

    #[test]
    fn test_balance_of_call_encoding() {
        let account = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let encoded = IERC20::balanceOfCall { account }.abi_encode();

        // balanceOf(address) function selector is 0x70a08231
        assert_eq!(&encoded[0..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(encoded.len(), 36);
    }

    #[test]
    fn test_metadata_selectors() {
        // name() 0x06fdde03, symbol() 0x95d89b41, decimals() 0x313ce567, totalSupply() 0x18160ddd
        assert_eq!(IERC20::nameCall {}.abi_encode(), vec![0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(IERC20::symbolCall {}.abi_encode(), vec![0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(IERC20::decimalsCall {}.abi_encode(), vec![0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(IERC20::totalSupplyCall {}.abi_encode(), vec![0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_transfer_event_signature() {
        assert_eq!(
            IERC20::Transfer::SIGNATURE_HASH,
            b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }
}
