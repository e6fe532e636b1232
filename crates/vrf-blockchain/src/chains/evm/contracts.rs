use alloy::sol;

sol!(
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract NativeVRF {
        event RandomRequested(uint256 indexed requestId);
        event RandomFulfilled(uint256 indexed requestId, uint256 random);

        function currentRequestId() external view returns (uint256);
        function latestFulfillId() external view returns (uint256);
        function difficulty() external view returns (uint256);
        function randomResults(uint256 requestId) external view returns (uint256);

        function fulfillRandomness(
            uint256[] memory requestIds,
            uint256[] memory randInputs,
            bytes[] memory signatures
        ) external;
    }
);
