//! Solidity bindings.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    contract ITokenStaking {
        function stake(uint256 amount) external;
        function stakeForLevel(uint256 amount, uint64 levelId) external;
        function timelocks(address account, uint256 index) external view returns (uint128 amount, uint64 expires);
    }
}
